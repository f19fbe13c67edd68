//! CSV parsing for the passenger manifest, with encoding and delimiter auto-detection.
//!
//! Bytes are decoded to text first (chardet + encoding_rs), then read with the
//! `csv` crate straight into typed [`Passenger`] records. The header row is
//! checked against [`REQUIRED_COLUMNS`] before any row is read so that a schema
//! mismatch is reported by column name rather than as a deserialization error.

use crate::error::{ParseError, ParseResult};
use crate::models::Passenger;

/// Columns every analysis depends on.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "PassengerId",
    "Survived",
    "Pclass",
    "Name",
    "Sex",
    "Age",
    "SibSp",
    "Parch",
    "Fare",
];

/// Parsed manifest with the detected input format.
#[derive(Debug, Clone)]
pub struct ParsedManifest {
    /// Passengers in source order
    pub passengers: Vec<Passenger>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; chardet is only consulted when it is not.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels fall back to lossy UTF-8. Known labels must decode cleanly.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ParseResult<String> {
    let Some(codec) = encoding_rs::Encoding::for_label(encoding.as_bytes()) else {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    };

    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(ParseError::Encoding {
            encoding: encoding.to_string(),
            message: "content contains invalid byte sequences".to_string(),
        });
    }

    Ok(text.into_owned())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Check that every required column is present, naming the first one missing.
pub fn validate_headers(headers: &[String]) -> ParseResult<()> {
    match REQUIRED_COLUMNS
        .iter()
        .find(|required| !headers.iter().any(|h| h == *required))
    {
        Some(missing) => Err(ParseError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Parse decoded CSV text with an explicit delimiter.
pub fn parse_passengers(content: &str, delimiter: char) -> ParseResult<(Vec<String>, Vec<Passenger>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::EmptyFile);
    }
    validate_headers(&headers)?;

    let mut passengers = Vec::new();
    for record in reader.deserialize::<Passenger>() {
        let passenger = record.map_err(|e| ParseError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        passengers.push(passenger);
    }

    Ok((headers, passengers))
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> ParseResult<ParsedManifest> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    let (headers, passengers) = parse_passengers(&content, delimiter)?;

    Ok(ParsedManifest {
        passengers,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassengerClass, Sex};

    const SAMPLE: &str = "\
PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked
1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S
2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",female,38,1,0,PC 17599,71.2833,C85,C
6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q
";

    #[test]
    fn test_parse_typed_records() {
        let (headers, passengers) = parse_passengers(SAMPLE, ',').unwrap();

        assert_eq!(headers.len(), 12);
        assert_eq!(passengers.len(), 3);

        let braund = &passengers[0];
        assert_eq!(braund.passenger_id, 1);
        assert!(!braund.survived);
        assert_eq!(braund.pclass, PassengerClass::Third);
        assert_eq!(braund.name, "Braund, Mr. Owen Harris");
        assert_eq!(braund.sex, Sex::Male);
        assert_eq!(braund.age, Some(22.0));
        assert_eq!(braund.sib_sp, 1);
        assert_eq!(braund.fare, Some(7.25));
        assert_eq!(braund.cabin, None);

        assert!(passengers[1].survived);
        assert_eq!(passengers[1].cabin.as_deref(), Some("C85"));
    }

    #[test]
    fn test_missing_age_is_none() {
        let (_, passengers) = parse_passengers(SAMPLE, ',').unwrap();
        assert_eq!(passengers[2].age, None);
    }

    #[test]
    fn test_source_order_preserved() {
        let (_, passengers) = parse_passengers(SAMPLE, ',').unwrap();
        let ids: Vec<u32> = passengers.iter().map(|p| p.passenger_id).collect();
        assert_eq!(ids, vec![1, 2, 6]);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Fare\n\
                   1,1,2,\"Doe, Mrs. Jane\",female,30,0,1,13\n";
        let (_, passengers) = parse_passengers(csv, ',').unwrap();
        assert_eq!(passengers[0].ticket, None);
        assert_eq!(passengers[0].embarked, None);
        assert_eq!(passengers[0].family_size(), 2);
    }

    #[test]
    fn test_missing_column_named() {
        let csv = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch\n1,0,3,\"A, B\",male,1,0,0\n";
        let err = parse_passengers(csv, ',').unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "Fare"));
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let csv = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Fare\n\
                   1,0,3,\"A, Mr. B\",male,20,0,0,7.5\n\
                   2,0,7,\"C, Mr. D\",male,20,0,0,7.5\n";
        match parse_passengers(csv, ',').unwrap_err() {
            ParseError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_survived_flag_rejected() {
        let csv = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Fare\n\
                   1,2,3,\"A, Mr. B\",male,20,0,0,7.5\n";
        assert!(matches!(
            parse_passengers(csv, ',').unwrap_err(),
            ParseError::Malformed { .. }
        ));
    }

    #[test]
    fn test_empty_content() {
        assert!(matches!(parse_passengers("", ',').unwrap_err(), ParseError::EmptyFile));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse_semicolon() {
        // Swap unquoted commas for semicolons, keeping commas inside names.
        let csv = SAMPLE
            .lines()
            .map(|line| {
                let mut out = String::new();
                let mut quoted = false;
                for c in line.chars() {
                    match c {
                        '"' => {
                            quoted = !quoted;
                            out.push(c);
                        }
                        ',' if !quoted => out.push(';'),
                        _ => out.push(c),
                    }
                }
                out
            })
            .collect::<Vec<_>>()
            .join("\n");

        let manifest = parse_bytes_auto(csv.as_bytes()).unwrap();
        assert_eq!(manifest.delimiter, ';');
        assert_eq!(manifest.passengers.len(), 3);
        assert_eq!(manifest.passengers[0].name, "Braund, Mr. Owen Harris");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_mostly_ascii_utf8_detected_as_utf8() {
        let mut csv = String::from("PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Fare\n");
        for id in 1..50 {
            csv.push_str(&format!("{},0,3,\"Smith, Mr. John\",male,30,0,0,7.25\n", id));
        }
        csv.push_str("50,1,1,\"Aubart, Mme. Léontine Pauline\",female,24,0,0,69.3\n");

        assert_eq!(detect_encoding(csv.as_bytes()), "utf-8");

        let manifest = parse_bytes_auto(csv.as_bytes()).unwrap();
        assert_eq!(manifest.passengers[49].name, "Aubart, Mme. Léontine Pauline");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes: &[u8] = &[0x61, 0xFF, 0xFE, 0x62];
        assert!(matches!(
            decode_content(bytes, "utf-8").unwrap_err(),
            ParseError::Encoding { .. }
        ));
    }
}
