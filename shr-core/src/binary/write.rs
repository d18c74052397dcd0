use std::marker::PhantomData;

use byteorder::ByteOrder;

/// Последовательная запись полей в буфер фиксированного размера.
///
/// Размер буфера известен заранее (раскладка записи), поэтому выход за
/// границу является ошибкой программиста и приводит к панике.
#[derive(Debug)]
pub struct FieldWriter<'a, B: ByteOrder> {
    buf: &'a mut [u8],
    off: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> FieldWriter<'a, B> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            off: 0,
            _order: PhantomData,
        }
    }

    pub fn position(&self) -> usize {
        self.off
    }

    fn slot(
        &mut self,
        n: usize,
    ) -> &mut [u8] {
        let slice = &mut self.buf[self.off..self.off + n];
        self.off += n;
        slice
    }

    pub fn u8(
        &mut self,
        val: u8,
    ) {
        self.slot(1)[0] = val;
    }

    pub fn u16(
        &mut self,
        val: u16,
    ) {
        B::write_u16(self.slot(2), val);
    }

    pub fn u32(
        &mut self,
        val: u32,
    ) {
        B::write_u32(self.slot(4), val);
    }

    pub fn u64(
        &mut self,
        val: u64,
    ) {
        B::write_u64(self.slot(8), val);
    }

    pub fn i32(
        &mut self,
        val: i32,
    ) {
        B::write_i32(self.slot(4), val);
    }

    pub fn f32(
        &mut self,
        val: f32,
    ) {
        B::write_f32(self.slot(4), val);
    }

    pub fn f64(
        &mut self,
        val: f64,
    ) {
        B::write_f64(self.slot(8), val);
    }

    pub fn u16_slice(
        &mut self,
        vals: &[u16],
    ) {
        B::write_u16_into(vals, self.slot(vals.len() * 2));
    }

    pub fn u32_slice(
        &mut self,
        vals: &[u32],
    ) {
        B::write_u32_into(vals, self.slot(vals.len() * 4));
    }

    pub fn bytes(
        &mut self,
        vals: &[u8],
    ) {
        self.slot(vals.len()).copy_from_slice(vals);
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{BigEndian, LittleEndian};

    use super::*;
    use crate::binary::FieldReader;

    #[test]
    fn test_writer_layout_le() {
        let mut buf = [0u8; 7];
        let mut w = FieldWriter::<LittleEndian>::new(&mut buf);

        w.u16(0xAA55);
        w.u32(0x0102_0304);
        w.u8(7);
        assert_eq!(w.position(), 7);
        assert_eq!(buf, [0x55, 0xAA, 0x04, 0x03, 0x02, 0x01, 7]);
    }

    #[test]
    fn test_writer_reader_agree() {
        let mut buf = [0u8; 24];
        {
            let mut w = FieldWriter::<BigEndian>::new(&mut buf);
            w.f64(-1.25e9);
            w.i32(-30);
            w.f32(0.5);
            w.u16_slice(&[1, 2, 3, 4]);
        }

        let mut r = FieldReader::<BigEndian>::new(&buf);
        assert_eq!(r.f64().unwrap(), -1.25e9);
        assert_eq!(r.i32().unwrap(), -30);
        assert_eq!(r.f32().unwrap(), 0.5);
        assert_eq!(r.u16_array::<4>().unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn test_writer_overflow_panics() {
        let mut buf = [0u8; 2];
        let mut w = FieldWriter::<LittleEndian>::new(&mut buf);
        w.u32(1);
    }
}
