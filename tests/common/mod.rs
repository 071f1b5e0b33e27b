//! Builds small xlsx workbooks in memory for the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

#[derive(Debug, Clone)]
pub enum Cell {
    Num(f64),
    Str(&'static str),
    Blank,
}

pub use Cell::{Blank, Num, Str};

fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ascii column letters")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(rows: &[Vec<Cell>], strings: &mut Vec<&'static str>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letters(c), r + 1);
            match cell {
                Num(v) => xml.push_str(&format!(r#"<c r="{reference}"><v>{v}</v></c>"#)),
                Str(s) => {
                    let idx = match strings.iter().position(|known| known == s) {
                        Some(idx) => idx,
                        None => {
                            strings.push(*s);
                            strings.len() - 1
                        }
                    };
                    xml.push_str(&format!(r#"<c r="{reference}" t="s"><v>{idx}</v></c>"#));
                }
                Blank => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn shared_strings_xml(strings: &[&str]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)));
    }
    xml.push_str("</sst>");
    xml
}

/// An xlsx workbook whose sheets hold `sheets` in order. Row 0 of each sheet
/// is written to spreadsheet row 1.
pub fn workbook(sheets: &[Vec<Vec<Cell>>]) -> Vec<u8> {
    let mut strings = Vec::new();
    let sheet_parts: Vec<String> = sheets
        .iter()
        .map(|rows| sheet_xml(rows, &mut strings))
        .collect();

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();

        let mut overrides = String::new();
        let mut sheet_entries = String::new();
        let mut rels = String::new();
        for i in 1..=sheet_parts.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            sheet_entries.push_str(&format!(
                r#"<sheet name="Sheet{i}" sheetId="{i}" r:id="rId{i}"/>"#
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            ));
        }
        let strings_rel = sheet_parts.len() + 1;
        rels.push_str(&format!(
            r#"<Relationship Id="rId{strings_rel}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#
        ));

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>{overrides}</Types>"#
        ).as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#).unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
        ).as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        ).as_bytes()).unwrap();

        zip.start_file("xl/styles.xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#).unwrap();

        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        zip.write_all(shared_strings_xml(&strings).as_bytes()).unwrap();

        for (i, part) in sheet_parts.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options).unwrap();
            zip.write_all(part.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }
    buf
}

/// A single-sheet xlsx workbook.
pub fn xlsx(rows: Vec<Vec<Cell>>) -> Vec<u8> {
    workbook(&[rows])
}

/// Product/Price/Quantity sheet with four items.
pub fn simple_workbook() -> Vec<u8> {
    xlsx(vec![
        vec![Str("Product"), Str("Price"), Str("Quantity")],
        vec![Str("Item 1"), Num(100.50), Num(10.0)],
        vec![Str("Item 2"), Num(200.00), Num(5.0)],
        vec![Str("Item 3"), Num(150.75), Num(8.0)],
        vec![Str("Item 4"), Num(75.25), Num(15.0)],
    ])
}
