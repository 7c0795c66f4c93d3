//! Integration tests for dsvstream

use dsvstream::{
    create_row_to_object_mapper, format_row, format_rows, format_value, parse, parse_rows,
    DsvError, DsvOptions, DsvParser, DsvReader, DsvValue, DsvWriter, Record,
};

fn parse_chunks(chunks: &[&str], options: &DsvOptions) -> Vec<Vec<String>> {
    let mut parser = DsvParser::new(*options);
    let mut rows = Vec::new();
    for chunk in chunks {
        parser.feed(chunk, |row| rows.push(row));
    }
    parser.finish(|row| rows.push(row));
    rows
}

fn text_rows(rows: &[&[&str]]) -> Vec<Vec<DsvValue>> {
    rows.iter()
        .map(|row| row.iter().map(|s| DsvValue::from(*s)).collect())
        .collect()
}

#[test]
fn test_write_and_read_roundtrip() {
    let options = DsvOptions::default();
    let plain: &[&[&str]] = &[&["Name", "Age", "City"], &["Alice", "30", "NYC"], &["Bob", "25", "SF"]];

    let text = format_rows(&text_rows(plain), &options);
    assert_eq!(text, "Name,Age,City\nAlice,30,NYC\nBob,25,SF\n");

    let rows = parse_rows(&text, &options);
    assert_eq!(rows.len(), 3);
    for (parsed, original) in rows.iter().zip(plain) {
        assert_eq!(parsed, original);
    }
}

/// Small deterministic generator for test documents
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as usize
    }
}

#[test]
fn test_generated_alphanumeric_roundtrip() {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    for (seed, options) in [
        (1, DsvOptions::default()),
        (7, DsvOptions::new(';', '\'').unwrap()),
        (42, DsvOptions::new('\t', '"').unwrap()),
    ] {
        let mut rng = Lcg(seed);
        for case in 0..50 {
            let row_count = 1 + rng.next(20);
            let rows: Vec<Vec<String>> = (0..row_count)
                .map(|_| {
                    // Ragged widths are allowed
                    let width = 1 + rng.next(8);
                    (0..width)
                        .map(|_| {
                            let len = 1 + rng.next(12);
                            (0..len)
                                .map(|_| ALPHABET[rng.next(ALPHABET.len())] as char)
                                .collect()
                        })
                        .collect()
                })
                .collect();

            let values: Vec<Vec<DsvValue>> = rows
                .iter()
                .map(|row| row.iter().map(|s| DsvValue::from(s.as_str())).collect())
                .collect();
            let text = format_rows(&values, &options);
            assert_eq!(parse_rows(&text, &options), rows, "seed {} case {}", seed, case);
        }
    }
}

#[test]
fn test_roundtrip_special_characters() {
    let options = DsvOptions::default();
    let tricky: &[&[&str]] = &[
        &["a\"b", "a,b", "line1\nline2"],
        &["", "\"", "cr\r\nlf"],
        &["\"\"", ",", "trailing space "],
    ];

    let text = format_rows(&text_rows(tricky), &options);
    let rows = parse_rows(&text, &options);
    assert_eq!(rows.len(), tricky.len());
    for (parsed, original) in rows.iter().zip(tricky) {
        assert_eq!(parsed, original);
    }
}

#[test]
fn test_roundtrip_custom_options() {
    let options = DsvOptions::new('\t', '\'').unwrap();
    let tricky: &[&[&str]] = &[&["it's", "tab\there", "comma,\"plain\""]];

    let text = format_rows(&text_rows(tricky), &options);
    assert_eq!(text, "'it''s'\t'tab\there'\tcomma,\"plain\"\n");
    assert_eq!(parse_rows(&text, &options), vec![vec!["it's", "tab\there", "comma,\"plain\""]]);
}

#[test]
fn test_escaping_idempotence() {
    let options = DsvOptions::default();
    let formatted = format_value(&DsvValue::from("a\"b"), &options);
    assert_eq!(formatted, "\"a\"\"b\"");
    assert_eq!(parse_rows(&formatted, &options), vec![vec!["a\"b"]]);
}

#[test]
fn test_delimiter_and_newline_containment() {
    let options = DsvOptions::default();

    let comma = format_value(&DsvValue::from("a,b"), &options);
    assert_eq!(comma, "\"a,b\"");
    assert_eq!(parse_rows(&comma, &options), vec![vec!["a,b"]]);

    let lines = format_value(&DsvValue::from("line1\nline2"), &options);
    assert_eq!(lines, "\"line1\nline2\"");
    assert_eq!(parse_rows(&lines, &options), vec![vec!["line1\nline2"]]);
}

#[test]
fn test_missing_trailing_terminator() {
    assert_eq!(
        parse_rows("a,b,c", &DsvOptions::default()),
        vec![vec!["a", "b", "c"]]
    );
}

#[test]
fn test_empty_document_asymmetry() {
    let options = DsvOptions::default();
    assert!(parse_rows("", &options).is_empty());

    let empty: Vec<Vec<DsvValue>> = Vec::new();
    let text = format_rows(&empty, &options);
    assert_eq!(text, "\n");
    // Reading the formatted empty document back gives one empty row, not zero
    assert_eq!(parse_rows(&text, &options), vec![vec![""]]);
}

#[test]
fn test_literal_rows() {
    let rows = vec![
        vec![DsvValue::from("a"), DsvValue::from("b"), DsvValue::from("c")],
        vec![DsvValue::from(1), DsvValue::from(2), DsvValue::from(3)],
    ];
    assert_eq!(format_rows(&rows, &DsvOptions::default()), "a,b,c\n1,2,3\n");
}

#[test]
fn test_typed_row() {
    use chrono::{TimeZone, Utc};

    let date = Utc.with_ymd_and_hms(2021, 6, 15, 12, 30, 0).unwrap();
    let row = vec![
        DsvValue::Null,
        DsvValue::from(true),
        DsvValue::from(-7),
        DsvValue::from(0.25),
        DsvValue::from(date),
        DsvValue::from(vec![0xDEu8, 0xAD, 0xBE, 0xEF]),
        DsvValue::from(None::<&str>),
    ];
    assert_eq!(
        format_row(&row, &DsvOptions::default()),
        ",true,-7,0.25,2021-06-15T12:30:00.000Z,3q2+7w==,"
    );
}

#[test]
fn test_mapper_with_parser() {
    let mut records: Vec<Record> = Vec::new();
    {
        let on_row = create_row_to_object_mapper(|record| records.push(record));
        parse("a,b,c\nd,e,f\n", &DsvOptions::default(), on_row);
    }

    assert_eq!(records.len(), 1);
    let expected: Record = [("a", "d"), ("b", "e"), ("c", "f")].into_iter().collect();
    assert_eq!(records[0], expected);
}

#[test]
fn test_chunked_parsing_equivalence() {
    let options = DsvOptions::default();
    let document = "id,text,note\r\n1,\"quoted, with \"\"escapes\"\"\",x\n2,\"multi\nline\",\r3,,\"\"\n\n4,plain,end";
    let whole = parse_rows(document, &options);
    assert_eq!(whole.len(), 6);

    let boundaries: Vec<usize> = document.char_indices().map(|(i, _)| i).collect();

    // Every two-way split
    for &split in &boundaries {
        let (head, tail) = document.split_at(split);
        assert_eq!(parse_chunks(&[head, tail], &options), whole, "split at {}", split);
    }

    // Fixed-size chunks
    for size in 1..8 {
        let chunks: Vec<&str> = boundaries
            .iter()
            .step_by(size)
            .zip(boundaries.iter().step_by(size).skip(1).chain(std::iter::once(&document.len())))
            .map(|(&start, &end)| &document[start..end])
            .collect();
        assert_eq!(chunks.concat(), document);
        assert_eq!(parse_chunks(&chunks, &options), whole, "chunk size {}", size);
    }
}

#[test]
fn test_byte_chunks_equivalence() {
    let options = DsvOptions::default();
    let document = "ville,pays\nZürich,\"Schweiz, CH\"\n東京,日本\n";
    let whole = parse_rows(document, &options);
    let bytes = document.as_bytes();

    for split in 0..=bytes.len() {
        let mut parser = DsvParser::new(options);
        let mut rows = Vec::new();
        parser.feed_bytes(&bytes[..split], |row| rows.push(row));
        parser.feed_bytes(&bytes[split..], |row| rows.push(row));
        parser.finish(|row| rows.push(row));
        assert_eq!(rows, whole, "byte split at {}", split);
    }

    let mut parser = DsvParser::new(options);
    let mut rows = Vec::new();
    for byte in bytes {
        parser.feed_bytes(std::slice::from_ref(byte), |row| rows.push(row));
    }
    parser.finish(|row| rows.push(row));
    assert_eq!(rows, whole);
}

#[test]
fn test_strict_mode_same_rows() {
    let options = DsvOptions::default();
    let input = "a,b\n\"x\"y,z\n";

    let lenient = parse_rows(input, &options);

    let mut parser = DsvParser::new(options);
    let mut strict_rows = Vec::new();
    parser.feed(input, |row| strict_rows.push(row));
    let result = parser.finish_strict(|row| strict_rows.push(row));

    assert_eq!(strict_rows, lenient);
    assert_eq!(
        result,
        Err(DsvError::TrailingAfterQuote {
            row: 2,
            field: 1,
            ch: 'y'
        })
    );
}

#[test]
fn test_invalid_configuration() {
    let err = DsvOptions::new(',', ',').unwrap_err();
    assert!(err.is_config());
    assert_eq!(err, DsvError::ConflictingCharacters(','));

    assert!(DsvOptions::from_strs("ab", "\"").unwrap_err().is_config());
    assert!(DsvOptions::from_strs(",", "").unwrap_err().is_config());
}

#[test]
fn test_writer_matches_format_rows() {
    let options = DsvOptions::new(';', '"').unwrap();
    let rows = vec![
        vec![DsvValue::from("x;y"), DsvValue::from(1.5)],
        vec![DsvValue::Null, DsvValue::from("z")],
    ];

    let mut writer = DsvWriter::new(options);
    for row in &rows {
        writer.write_row_typed(row);
    }
    assert_eq!(writer.finish(), format_rows(&rows, &options));
}

#[test]
fn test_reader_records() {
    let chunks = ["name,score\nAnn,", "10\nBo", "b,7"];
    let mut reader = DsvReader::new(chunks, DsvOptions::default());

    let records: Vec<Record> = reader.records().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("score"), Some("10"));
    assert_eq!(records[1].get("name"), Some("Bob"));
    assert_eq!(reader.row_count(), 3);
}

#[cfg(feature = "serde")]
#[test]
fn test_options_from_config() {
    let options: DsvOptions = serde_json::from_str(r#"{"delimiter": ";"}"#).unwrap();
    assert_eq!(options, DsvOptions::new(';', '"').unwrap());

    assert!(serde_json::from_str::<DsvOptions>(r#"{"delimiter": "\""}"#).is_err());
    assert!(serde_json::from_str::<DsvOptions>(r#"{"enclosing": "ab"}"#).is_err());

    let json = serde_json::to_string(&DsvOptions::default()).unwrap();
    assert_eq!(json, r#"{"delimiter":",","enclosing":"\""}"#);
}

#[cfg(feature = "serde")]
#[test]
fn test_record_serializes_in_order() {
    let record: Record = [("z", "1"), ("a", "2")].into_iter().collect();
    assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"z":"1","a":"2"}"#);
}
