use std::fmt;

use serde::Serialize;

/// Значение одного именованного поля записи SHR.
///
/// Используется для плоского перечисления полей заголовков в порядке
/// объявления (ключи FITS, колонки CSV).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    F32(f32),
    F64(f64),
    Text(String),
}

impl FieldValue {
    /// Целочисленное значение (если поле целое).
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::U8(v) => Some(v as i64),
            FieldValue::U16(v) => Some(v as i64),
            FieldValue::U32(v) => Some(v as i64),
            FieldValue::U64(v) => i64::try_from(v).ok(),
            FieldValue::I32(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Значение с плавающей точкой (если поле вещественное).
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::F32(v) => Some(v as f64),
            FieldValue::F64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            FieldValue::U8(v) => write!(f, "{v}"),
            FieldValue::U16(v) => write!(f, "{v}"),
            FieldValue::U32(v) => write!(f, "{v}"),
            FieldValue::U64(v) => write!(f, "{v}"),
            FieldValue::I32(v) => write!(f, "{v}"),
            // Debug даёт кратчайшее точное представление и сохраняет ".0"
            FieldValue::F32(v) => write!(f, "{v:?}"),
            FieldValue::F64(v) => write!(f, "{v:?}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Декодирует массив кодовых единиц в строку.
///
/// Каждая единица трактуется как один байт ASCII. Все нулевые единицы
/// выбрасываются (в том числе в середине строки), не-ASCII единицы
/// заменяются на U+FFFD, результат обрезается по пробелам с обеих сторон.
pub fn decode_code_units<T>(units: &[T]) -> String
where
    T: Copy + Into<u32>,
{
    let text: String = units
        .iter()
        .map(|&u| Into::<u32>::into(u))
        .filter(|&u| u != 0)
        .map(|u| {
            if u < 0x80 {
                char::from(u as u8)
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect();

    text.trim().to_string()
}
