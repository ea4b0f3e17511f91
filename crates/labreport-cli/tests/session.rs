//! End-to-end sessions over report files on disk.

use std::fs;

use labreport_cli::session::AnalysisSession;
use labreport_ingest::{DocumentKind, ReadOptions, TextEncoding};
use labreport_model::{ExtractOptions, TieBreak};
use labreport_report::to_csv_string;
use labreport_standards::builtin_parameter_set;

const LATIN1_REPORT: &[u8] = b"<html><body><table>\
<tr><td>Objeto Analizado</td><td>Rango normal</td><td>Valor obtenido</td></tr>\
<tr><td>Viscosidad  de la  Sangre</td><td>48.264 - 65.371</td><td>72.211</td></tr>\
<tr><td>viscosidad de la sangre</td><td>48.264 - 65.371</td><td>99.0</td></tr>\
<tr><td>Unknown Param</td><td>-</td><td>5</td></tr>\
<tr><td>Hierro</td><td>1 - 2</td><td>  </td></tr>\
<tr><td>Glucag\xf3n</td><td>50 - 100</td><td>61.2</td></tr>\
<tr><td>Indice de Acido Urico</td><td>1 - 2</td><td>1.4</td></tr>\
</table></body></html>";

fn session() -> AnalysisSession {
    AnalysisSession::new(builtin_parameter_set().expect("builtin vocabulary"))
}

#[test]
fn latin1_report_end_to_end() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.htm");
    fs::write(&path, LATIN1_REPORT).expect("write report");

    let mut session = session();
    let report = session.process(&path);

    assert_eq!(report.kind, Some(DocumentKind::Html));
    assert!(!report.is_unparseable());
    assert_eq!(
        report.table().rows(),
        vec![
            (1, "Viscosidad de la Sangre", "72.211"),
            (2, "Glucagón", "61.2"),
            (3, "Índice de Ácido Úrico", "1.4"),
        ]
    );
    assert_eq!(report.outcome.stats.duplicates, 1);
    assert_eq!(report.outcome.stats.empty_values, 1);
    assert_eq!(report.outcome.unmatched.len(), 1);

    let csv = to_csv_string(report.table()).expect("csv");
    insta::assert_snapshot!(csv, @r"
    #,Objeto Analizado,Valor Obtenido
    1,Viscosidad de la Sangre,72.211
    2,Glucagón,61.2
    3,Índice de Ácido Úrico,1.4
    ");
}

#[test]
fn unparseable_document_leaves_empty_result_and_session_continues() {
    let dir = tempfile::tempdir().expect("temp dir");
    let good = dir.path().join("informe.html");
    let bad = dir.path().join("informe.pdf");
    fs::write(&good, LATIN1_REPORT).expect("write report");
    fs::write(&bad, b"not a pdf at all").expect("write pdf");

    let mut session = session();
    assert!(!session.process(&good).is_empty());

    let report = session.process(&bad);
    assert!(report.is_unparseable());
    assert!(report.is_empty());
    assert!(session.last_result().is_some_and(|table| table.is_empty()));

    assert!(!session.process(&good).is_empty());
}

/// One-page PDF whose only font lacks `/BaseFont`.
fn pdf_with_broken_font() -> Vec<u8> {
    let content = "BT /F1 12 Tf 72 712 Td (Hierro) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 >>".to_string(),
    ];
    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }
    let xref = pdf.len();
    let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        tail.push_str(&format!("{offset:010} 00000 n \n"));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(tail.as_bytes());
    pdf
}

#[test]
fn malformed_pdf_font_does_not_abort_the_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let good = dir.path().join("informe.html");
    fs::write(&good, LATIN1_REPORT).expect("write report");

    let mut session = session();
    let report = session.process_bytes(&dir.path().join("roto.pdf"), &pdf_with_broken_font());
    assert!(report.is_unparseable());
    assert!(report.failure.as_deref().is_some_and(|msg| msg.contains("malformed")));
    assert!(session.last_result().is_some_and(|table| table.is_empty()));

    assert!(!session.process(&good).is_empty());
}

#[test]
fn missing_file_is_reported_not_raised() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut session = session();
    let report = session.process(&dir.path().join("absent.html"));
    assert!(report.is_unparseable());
    assert!(report.failure.as_deref().is_some_and(|msg| msg.contains("absent.html")));
}

#[test]
fn options_flow_into_extraction() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.html");
    fs::write(&path, LATIN1_REPORT).expect("write report");

    let options = ExtractOptions::new()
        .with_threshold(1.0)
        .expect("threshold")
        .with_tie_break(TieBreak::Reject);
    let mut session = session().with_options(options);
    let report = session.process(&path);

    // The unaccented uric-acid label only matches fuzzily.
    assert_eq!(
        report.table().rows(),
        vec![
            (1, "Viscosidad de la Sangre", "72.211"),
            (2, "Glucagón", "61.2"),
        ]
    );
}

#[test]
fn utf8_encoding_rejects_latin1_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("informe.html");
    fs::write(&path, LATIN1_REPORT).expect("write report");

    let mut session = session().with_read_options(ReadOptions {
        encoding: TextEncoding::Utf8,
    });
    assert!(session.process(&path).is_unparseable());
}
