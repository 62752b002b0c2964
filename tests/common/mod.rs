#![allow(dead_code)]

use std::io::Write;

use chrono::NaiveDate;
use climate_folio::data::model::{Dataset, Observation};
use tempfile::NamedTempFile;

pub const HEADER: &str = "DATA MEDIÇÃO,CAPITAL,TEMP. MÉDIA MENSAL";

/// Last day of the `i`-th month after January 2015.
pub fn month_end(i: usize) -> NaiveDate {
    let year = 2015 + (i / 12) as i32;
    let month = (i % 12) as u32 + 1;
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1).unwrap().pred_opt().unwrap()
}

/// One category with consecutive monthly values.
pub fn series_dataset(category: &str, values: &[Option<f64>]) -> Dataset {
    Dataset::from_observations(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(month_end(i), category, v))
            .collect(),
    )
}

/// Three capitals over ten years with a seasonal cycle and a small warming trend.
pub fn capitals_dataset() -> Dataset {
    let capitals = [("Brasília", 21.5, 1.8), ("Curitiba", 17.5, 4.0), ("Recife", 26.5, 1.2)];
    let mut rows = Vec::new();
    for i in 0..120 {
        let phase = 2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0;
        for (name, mean, amp) in capitals {
            let wiggle = ((i * 7 + name.len()) % 5) as f64 * 0.1;
            let v = mean + amp * phase.cos() + 0.03 * (i / 12) as f64 + wiggle;
            rows.push(Observation::new(month_end(i), name, Some(v)));
        }
    }
    Dataset::from_observations(rows)
}

/// Write `lines` (header included) to a temporary `.csv` file.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// A worksheet cell for [`xlsx_file`].
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial day, stored with a built-in date format.
    Serial(u32),
    /// ISO 8601 text stored as a typed date cell (`t="d"`).
    IsoDate(&'a str),
    Blank,
}

pub type Sheet<'a> = (&'a str, Vec<Vec<Cell<'a>>>);

/// Write a minimal `.xlsx` workbook with one worksheet per entry of `sheets`.
pub fn xlsx_file(sheets: &[Sheet<'_>]) -> NamedTempFile {
    use zip::write::SimpleFileOptions;

    let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let mut zip = zip::ZipWriter::new(file.as_file());

    let mut put = |name: &str, body: String| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };

    let overrides: String = (1..=sheets.len())
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    put(
        "[Content_Types].xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{overrides}</Types>"#
        ),
    );
    put(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            .to_string(),
    );

    let sheet_entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            format!(
                r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                escape(name),
                n = i + 1
            )
        })
        .collect();
    put(
        "xl/workbook.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
        ),
    );

    let sheet_rels: String = (1..=sheets.len())
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            )
        })
        .collect();
    put(
        "xl/_rels/workbook.xml.rels",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{sheet_rels}<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
        ),
    );

    // Style 1 is the built-in short date format (numFmtId 14).
    put(
        "xl/styles.xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#
            .to_string(),
    );

    for (i, (_, rows)) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), worksheet_xml(rows));
    }

    zip.finish().unwrap();
    file
}

fn worksheet_xml(rows: &[Vec<Cell<'_>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let r = r + 1;
        xml.push_str(&format!(r#"<row r="{r}">"#));
        for (c, cell) in row.iter().enumerate() {
            let at = format!("{}{r}", (b'A' + c as u8) as char);
            let cell_xml = match cell {
                Cell::Text(s) => format!(
                    r#"<c r="{at}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(s)
                ),
                Cell::Number(v) => format!(r#"<c r="{at}"><v>{v}</v></c>"#),
                Cell::Serial(d) => format!(r#"<c r="{at}" s="1"><v>{d}</v></c>"#),
                Cell::IsoDate(s) => format!(r#"<c r="{at}" t="d"><v>{s}</v></c>"#),
                Cell::Blank => continue,
            };
            xml.push_str(&cell_xml);
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
