//! Run identity from a filename stem.
//!
//! Grammar, tokens split on `_` and scanned left to right:
//!
//! | token                 | effect                                              |
//! |-----------------------|-----------------------------------------------------|
//! | `naca` (any case)     | next token is the profile; airfoil = `naca_<next>`  |
//! | `i` (any case)        | next token is the angle, with `-` read as `.`       |
//! | `i<rest>` (any case)  | `<rest>` is the angle, taken verbatim               |
//!
//! Tokens consumed as a value are not scanned again, so `naca_i23_i5`
//! names airfoil `naca_i23` at 5 degrees.

use std::path::Path;

use crate::data::model::AirfoilId;
use crate::error::{Error, NameFault, Result};

/// Identity recovered from a filename. Reynolds comes from the load call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunName {
    pub airfoil: AirfoilId,
    pub angle_deg: f64,
}

/// Parse the stem of `path` (extension stripped).
pub fn parse_path(path: &Path) -> Result<RunName> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_stem(&stem, &file)
}

/// Parse a filename stem. `file` is only used to name the offender in errors.
///
/// Every field starts unassigned on each call. The result is a
/// [`Error::MalformedName`] when a field is still unassigned after the scan,
/// when an angle is not a finite number, or when the airfoil or angle is
/// given twice ([`NameFault::RepeatedField`]); a repeat never overwrites.
pub fn parse_stem(stem: &str, file: &str) -> Result<RunName> {
    let tokens: Vec<&str> = stem.split('_').collect();

    let mut airfoil: Option<AirfoilId> = None;
    let mut angle: Option<f64> = None;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let lower = token.to_ascii_lowercase();

        if lower == "naca" {
            let next = value_after(&tokens, i, token, file)?;
            set_once(&mut airfoil, AirfoilId::new(format!("naca_{next}")), "airfoil", file)?;
            i += 2;
        } else if lower == "i" {
            let next = value_after(&tokens, i, token, file)?;
            let value = parse_angle(&next.replace('-', "."), file)?;
            set_once(&mut angle, value, "angle", file)?;
            i += 2;
        } else if let Some(rest) = strip_angle_prefix(token) {
            let value = parse_angle(rest, file)?;
            set_once(&mut angle, value, "angle", file)?;
            i += 1;
        } else {
            i += 1;
        }
    }

    let airfoil = airfoil.ok_or_else(|| Error::malformed(file, NameFault::MissingAirfoil))?;
    let angle_deg = angle.ok_or_else(|| Error::malformed(file, NameFault::MissingAngle))?;
    Ok(RunName { airfoil, angle_deg })
}

/// Reynolds number from a directory name: `50000`, `5e4`, `re50000`,
/// `Re_50000` or `re-50000`. `None` unless positive and finite.
pub fn parse_reynolds_dir(name: &str) -> Option<f64> {
    let rest = match name.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("re") => {
            name[2..].trim_start_matches(&['_', '-'][..])
        }
        _ => name,
    };
    rest.parse::<f64>()
        .ok()
        .filter(|re| re.is_finite() && *re > 0.0)
}

fn value_after<'a>(tokens: &[&'a str], i: usize, keyword: &str, file: &str) -> Result<&'a str> {
    match tokens.get(i + 1) {
        Some(&next) if !next.is_empty() => Ok(next),
        _ => Err(Error::malformed(
            file,
            NameFault::DanglingKeyword(keyword.to_string()),
        )),
    }
}

fn strip_angle_prefix(token: &str) -> Option<&str> {
    let first = token.chars().next()?;
    if first.eq_ignore_ascii_case(&'i') {
        Some(&token[first.len_utf8()..])
    } else {
        None
    }
}

fn parse_angle(text: &str, file: &str) -> Result<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| Error::malformed(file, NameFault::InvalidAngle(text.to_string())))?;
    if !value.is_finite() {
        return Err(Error::malformed(file, NameFault::NonFiniteAngle(text.to_string())));
    }
    Ok(value + 0.0)
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str, file: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::malformed(file, NameFault::RepeatedField(field)));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(stem: &str) -> Result<RunName> {
        parse_stem(stem, &format!("{stem}.dat"))
    }

    fn fault(stem: &str) -> NameFault {
        match parse(stem) {
            Err(Error::MalformedName { fault, .. }) => fault,
            other => panic!("expected MalformedName for {stem}, got {other:?}"),
        }
    }

    #[test]
    fn test_fused_angle_token() {
        let name = parse("naca_2412_i-3").unwrap();
        assert_eq!(name.airfoil.as_str(), "naca_2412");
        assert_eq!(name.angle_deg, -3.0);

        let name = parse("naca_2412_i5").unwrap();
        assert_eq!(name.angle_deg, 5.0);
    }

    #[test]
    fn test_separate_angle_token_reads_dash_as_decimal_point() {
        let name = parse("naca_0012_i_2-5").unwrap();
        assert_eq!(name.airfoil.as_str(), "naca_0012");
        assert_eq!(name.angle_deg, 2.5);
    }

    #[test]
    fn test_fused_token_keeps_dash_as_sign() {
        assert_eq!(parse("naca_0012_i-2.5").unwrap().angle_deg, -2.5);
    }

    #[test]
    fn test_keywords_are_case_insensitive_but_values_verbatim() {
        let name = parse("NACA_23012A_I7").unwrap();
        assert_eq!(name.airfoil.as_str(), "naca_23012A");
        assert_eq!(name.angle_deg, 7.0);
    }

    #[test]
    fn test_token_order_and_extra_tokens() {
        let name = parse("run3_i10_naca_4415_final").unwrap();
        assert_eq!(name.airfoil.as_str(), "naca_4415");
        assert_eq!(name.angle_deg, 10.0);
    }

    #[test]
    fn test_consumed_airfoil_token_is_not_rescanned() {
        let name = parse("naca_i23_i5").unwrap();
        assert_eq!(name.airfoil.as_str(), "naca_i23");
        assert_eq!(name.angle_deg, 5.0);
    }

    #[test]
    fn test_missing_fields_fail() {
        assert_eq!(fault("garbage"), NameFault::MissingAirfoil);
        assert_eq!(fault("naca_2412"), NameFault::MissingAngle);
        assert_eq!(fault("i5"), NameFault::MissingAirfoil);
    }

    #[test]
    fn test_no_state_carries_between_files() {
        assert!(parse("naca_2412_i5").is_ok());
        assert!(matches!(fault("naca_2412"), NameFault::MissingAngle));
        assert!(matches!(fault("i5"), NameFault::MissingAirfoil));
    }

    #[test]
    fn test_bad_angles_fail() {
        assert_eq!(fault("naca_2412_info"), NameFault::InvalidAngle("nfo".into()));
        assert_eq!(fault("naca_2412_iinf"), NameFault::NonFiniteAngle("inf".into()));
        assert_eq!(fault("naca_2412_i_NaN"), NameFault::NonFiniteAngle("NaN".into()));
        assert_eq!(fault("naca_2412_i_x"), NameFault::InvalidAngle("x".into()));
    }

    #[test]
    fn test_dangling_and_repeated_keywords_fail() {
        assert_eq!(fault("i5_naca"), NameFault::DanglingKeyword("naca".into()));
        assert_eq!(fault("naca_2412_I"), NameFault::DanglingKeyword("I".into()));
        assert_eq!(fault("naca_2412_i5_i6"), NameFault::RepeatedField("angle"));
        assert_eq!(fault("naca_1_naca_2_i5"), NameFault::RepeatedField("airfoil"));
    }

    #[test]
    fn test_parse_path_strips_extension_and_names_file() {
        let name = parse_path(Path::new("/runs/naca_2412_i-3.5.dat")).unwrap();
        assert_eq!(name.angle_deg, -3.5);

        match parse_path(Path::new("/runs/garbage.dat")) {
            Err(Error::MalformedName { file, .. }) => assert_eq!(file, "garbage.dat"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reynolds_directory_names() {
        assert_eq!(parse_reynolds_dir("50000"), Some(50_000.0));
        assert_eq!(parse_reynolds_dir("re50000"), Some(50_000.0));
        assert_eq!(parse_reynolds_dir("Re_1e5"), Some(100_000.0));
        assert_eq!(parse_reynolds_dir("RE-75000"), Some(75_000.0));
        assert_eq!(parse_reynolds_dir("notes"), None);
        assert_eq!(parse_reynolds_dir("re"), None);
        assert_eq!(parse_reynolds_dir("-5"), None);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        for stem in ["naca_2412_i-3", "naca_0012_i_2-5", "NACA_4415_I12"] {
            assert_eq!(parse(stem).unwrap(), parse(stem).unwrap());
        }
    }
}
