use std::fmt::{Display, Formatter};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    Absolute,
}

/// How the raw text of a measurement should be interpreted.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Double,
    String,
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveType::Double => f.write_str("DOUBLE"),
            PrimitiveType::String => f.write_str("STRING"),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub representation: PrimitiveType,
    pub value: String,
}

impl Measurement {
    /// An absolute measurement whose representation is inferred by attempting to parse `raw` as a double.
    ///
    /// See [`parse_double`] for the accepted forms.
    pub fn infer(raw: &str) -> Self {
        let representation = match parse_double(raw) {
            Some(_) => PrimitiveType::Double,
            None => PrimitiveType::String,
        };

        Self {
            kind: MeasurementKind::Absolute,
            representation,
            value: raw.to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.representation {
            PrimitiveType::Double => parse_double(&self.value),
            PrimitiveType::String => None,
        }
    }
}

/// Parses decimal doubles the way design files have always been read: an optional sign, digits with an optional
/// point and exponent, and an optional `f`/`F`/`d`/`D` suffix; or exactly `NaN` or `Infinity` after the sign.
///
/// Rust-only spellings such as `inf`, `nan` and `infinity` are not numbers here. Hexadecimal floats are not
/// supported.
pub fn parse_double(raw: &str) -> Option<f64> {
    let raw = raw.trim();

    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let special = match unsigned {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        _ => None,
    };
    if let Some(value) = special {
        return Some(if negative { -value } else { value });
    }

    let digits = unsigned
        .strip_suffix(['f', 'F', 'd', 'D'])
        .unwrap_or(unsigned);

    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || !digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let value = digits.parse::<f64>().ok()?;

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod measurement_tests {
    use rstest::rstest;

    use crate::measurement::{parse_double, Measurement, MeasurementKind, PrimitiveType};

    #[rstest]
    #[case("50", PrimitiveType::Double)]
    #[case("-0.25", PrimitiveType::Double)]
    #[case("1e-3", PrimitiveType::Double)]
    #[case("50 years", PrimitiveType::String)]
    #[case("adult", PrimitiveType::String)]
    #[case("5d", PrimitiveType::Double)]
    #[case("1.5F", PrimitiveType::Double)]
    #[case("-Infinity", PrimitiveType::Double)]
    #[case("NaN", PrimitiveType::Double)]
    #[case("inf", PrimitiveType::String)]
    #[case("nan", PrimitiveType::String)]
    #[case("infinity", PrimitiveType::String)]
    #[case("d", PrimitiveType::String)]
    #[case("--5", PrimitiveType::String)]
    fn infer(#[case] raw: &str, #[case] expected_representation: PrimitiveType) {
        // when
        let measurement = Measurement::infer(raw);

        // then
        assert_eq!(measurement.kind, MeasurementKind::Absolute);
        assert_eq!(measurement.representation, expected_representation);
        assert_eq!(measurement.value, raw);
    }

    #[test]
    fn string_measurements_have_no_numeric_value() {
        assert_eq!(Measurement::infer("50").as_f64(), Some(50.0));
        assert_eq!(Measurement::infer("fifty").as_f64(), None);
    }

    #[rstest]
    #[case("5d", Some(5.0))]
    #[case(" -2.5e1 ", Some(-25.0))]
    #[case("+.5", Some(0.5))]
    #[case("-Infinity", Some(f64::NEG_INFINITY))]
    #[case("Inf", None)]
    #[case("", None)]
    fn parses_design_file_doubles(#[case] raw: &str, #[case] expected_value: Option<f64>) {
        assert_eq!(parse_double(raw), expected_value);
    }
}
