use std::{
    io::{Read, Seek, SeekFrom},
    marker::PhantomData,
};

use byteorder::ByteOrder;
use shr_types::{ShrError, ShrResult};

/// Читает ровно `length` байт, при необходимости сначала переходя на
/// абсолютное смещение `offset`.
///
/// Если до конца источника осталось меньше `length` байт, возвращает
/// [`ShrError::TruncatedRead`]; частично заполненный буфер не отдаётся.
/// Буфер растёт по мере чтения, поэтому повреждённая длина не приводит к
/// выделению памяти под весь запрошенный размер.
pub fn read_exact_at<R: Read + Seek>(
    handle: &mut R,
    offset: Option<u64>,
    length: usize,
) -> ShrResult<Vec<u8>> {
    if let Some(off) = offset {
        handle.seek(SeekFrom::Start(off))?;
    }

    let mut buf = Vec::new();
    handle.by_ref().take(length as u64).read_to_end(&mut buf)?;

    if buf.len() < length {
        return Err(ShrError::truncated(length, buf.len()));
    }

    Ok(buf)
}

/// Выполняет `f` и возвращает курсор `handle` в исходную позицию.
///
/// Позиция восстанавливается и при ошибке внутри `f`; в этом случае
/// наружу уходит ошибка `f`.
pub fn with_restored_cursor<R, T, F>(
    handle: &mut R,
    f: F,
) -> ShrResult<T>
where
    R: Seek,
    F: FnOnce(&mut R) -> ShrResult<T>,
{
    let original = handle.stream_position()?;
    let result = f(handle);
    let restored = handle.seek(SeekFrom::Start(original));

    let value = result?;
    restored?;

    Ok(value)
}

/// Сдвигает курсор на `count` байт вперёд от текущей позиции.
pub fn skip_bytes<R: Seek>(
    handle: &mut R,
    count: u64,
) -> ShrResult<()> {
    let delta = i64::try_from(count)
        .map_err(|_| ShrError::malformed("sweep record", format!("skip of {count} bytes")))?;
    handle.seek(SeekFrom::Current(delta))?;
    Ok(())
}

/// Последовательное чтение полей из среза с заданным порядком байт.
#[derive(Debug)]
pub struct FieldReader<'a, B: ByteOrder> {
    buf: &'a [u8],
    off: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> FieldReader<'a, B> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            off: 0,
            _order: PhantomData,
        }
    }

    /// Сколько байт уже прочитано.
    pub fn position(&self) -> usize {
        self.off
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.off
    }

    fn take(
        &mut self,
        n: usize,
    ) -> ShrResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(ShrError::truncated(n, self.remaining()));
        }

        let buf = self.buf;
        let slice = &buf[self.off..self.off + n];
        self.off += n;

        Ok(slice)
    }

    pub fn u8(&mut self) -> ShrResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> ShrResult<u16> {
        Ok(B::read_u16(self.take(2)?))
    }

    pub fn u32(&mut self) -> ShrResult<u32> {
        Ok(B::read_u32(self.take(4)?))
    }

    pub fn u64(&mut self) -> ShrResult<u64> {
        Ok(B::read_u64(self.take(8)?))
    }

    pub fn i32(&mut self) -> ShrResult<i32> {
        Ok(B::read_i32(self.take(4)?))
    }

    pub fn f32(&mut self) -> ShrResult<f32> {
        Ok(B::read_f32(self.take(4)?))
    }

    pub fn f64(&mut self) -> ShrResult<f64> {
        Ok(B::read_f64(self.take(8)?))
    }

    pub fn u16_array<const N: usize>(&mut self) -> ShrResult<[u16; N]> {
        let mut out = [0u16; N];
        B::read_u16_into(self.take(N * 2)?, &mut out);
        Ok(out)
    }

    pub fn u32_array<const N: usize>(&mut self) -> ShrResult<[u32; N]> {
        let mut out = [0u32; N];
        B::read_u32_into(self.take(N * 4)?, &mut out);
        Ok(out)
    }

    pub fn bytes<const N: usize>(&mut self) -> ShrResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Читает `count` значений f32 подряд.
    pub fn f32_vec(
        &mut self,
        count: usize,
    ) -> ShrResult<Vec<f32>> {
        let len = count
            .checked_mul(4)
            .ok_or_else(|| ShrError::truncated(usize::MAX, self.remaining()))?;
        let src = self.take(len)?;
        let mut out = vec![0f32; count];

        B::read_f32_into(src, &mut out);

        Ok(out)
    }
}
