use std::fs;

use labreport_ingest::{DocumentKind, IngestError, ReadOptions, TextEncoding, read_document};

const REPORT: &[u8] = b"<html><body>\
<table>\
<tr><td>Objeto Analizado</td><td>Rango normal</td><td>Valor obtenido</td></tr>\
<tr><td>Viscosidad de la Sangre</td><td>48.264 - 65.371</td><td>72.211</td></tr>\
<tr><td>Gluc\xe1gon</td><td>50 - 100</td><td>61.2</td></tr>\
<tr><td>Nota</td></tr>\
</table>\
</body></html>";

#[test]
fn reads_latin1_html_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.htm");
    fs::write(&path, REPORT).expect("write report");

    let document = read_document(&path, &ReadOptions::default()).expect("read document");

    assert_eq!(document.kind, DocumentKind::Html);
    assert_eq!(document.tables.len(), 1);
    assert_eq!(document.row_count(), 3);
    assert_eq!(document.tables[0].rows[1][0], "Glucágon");
    assert_eq!(document.tables[0].rows[2], vec!["Nota"]);
}

#[test]
fn utf8_request_rejects_latin1_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.html");
    fs::write(&path, REPORT).expect("write report");

    let options = ReadOptions {
        encoding: TextEncoding::Utf8,
    };
    let err = read_document(&path, &options).unwrap_err();
    assert!(matches!(err, IngestError::InvalidUtf8(_)));
}

#[test]
fn corrupt_pdf_is_unparseable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.pdf");
    fs::write(&path, b"this is not a pdf").expect("write report");

    let err = read_document(&path, &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Pdf(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_document(&dir.path().join("absent.html"), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[test]
fn html_without_tables_is_unparseable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.html");
    fs::write(&path, "<html><body><p>Sin datos</p></body></html>").expect("write report");

    let err = read_document(&path, &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::NoTables));
}
