/// Единицы амплитуды свипа (поле `refScale` заголовка).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmplitudeUnit {
    /// Логарифмическая шкала, дБ
    Decibel,
    /// Линейная шкала, мВ
    MilliVolt,
}

impl AmplitudeUnit {
    /// Любое ненулевое значение `refScale` означает линейную шкалу.
    pub fn from_ref_scale(v: u32) -> Self {
        if v != 0 {
            AmplitudeUnit::MilliVolt
        } else {
            AmplitudeUnit::Decibel
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmplitudeUnit::Decibel => "dB",
            AmplitudeUnit::MilliVolt => "mV",
        }
    }
}

impl std::fmt::Display for AmplitudeUnit {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
