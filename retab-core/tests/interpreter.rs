//! End-to-end interpretation of schemas without repetition

mod common;

use common::{docs, run, try_run};
use retab_core::ReportError;

#[test]
fn single_field_reproduces_the_node_text_verbatim() {
    let documents = docs(&[("data.xml", "<Data><Name>Widget &amp; Co</Name></Data>")]);
    let lines = run(
        r#"<Report><Field location="/Data/Name"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"Widget & Co\""]);
}

#[test]
fn field_with_no_stack_takes_first_match_across_documents() {
    let documents = docs(&[
        ("a.xml", "<Data><Other>1</Other></Data>"),
        ("b.xml", "<Data><Name>from-b</Name></Data>"),
    ]);
    let lines = run(
        r#"<Report><Field location="/Data/Name"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"from-b\""]);
}

#[test]
fn missing_location_resolves_to_an_empty_field() {
    let documents = docs(&[("data.xml", "<Data><Name>x</Name></Data>")]);
    let lines = run(
        r#"<Report><Field location="/Data/Nothing"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"\""]);
}

#[test]
fn header_text_lands_on_its_own_line() {
    let documents = docs(&[("data.xml", "<Data><Name>x</Name></Data>")]);
    let lines = run(
        r#"<Report><Header>Name,Amount</Header><Field location="/Data/Name"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["Name,Amount", "\"x\""]);
}

#[test]
fn literal_text_separates_fields() {
    let documents = docs(&[("data.xml", "<Data><A>1</A><B>2</B></Data>")]);
    let lines = run(
        r#"<Report><Field location="/Data/A"/>,<Field location="/Data/B"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"1\",\"2\""]);
}

#[test]
fn unknown_elements_are_structural_passthroughs() {
    let documents = docs(&[("data.xml", "<Data><Name>x</Name></Data>")]);
    let lines = run(
        r#"<Report><Group><Field location="/Data/Name"/></Group></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"x\""]);
}

#[test]
fn field_name_special_outside_a_file_repeater_uses_the_first_document() {
    let documents = docs(&[
        ("first.xml", "<Data/>"),
        ("second.xml", "<Data/>"),
    ]);
    let lines = run(
        r#"<Report><Field special="_FileName"/></Report>"#,
        &documents,
    );
    assert_eq!(lines, ["\"first.xml\""]);
}

#[test]
fn malformed_location_path_aborts_the_run() {
    let documents = docs(&[("data.xml", "<Data/>")]);
    let err = try_run(
        r#"<Report><Field location="/Data/[1]"/></Report>"#,
        &documents,
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::MalformedPath { .. }));
}

#[test]
fn two_runs_over_the_same_inputs_are_identical() {
    let documents = docs(&[(
        "orders.xml",
        "<Orders><Order><Id>A</Id></Order><Order><Id>B</Id></Order></Orders>",
    )]);
    let schema = r#"<Report>
        <Repeater location="/Orders/Order"><Field location="/Orders/Order/Id"/><NewLine/></Repeater>
    </Report>"#;

    assert_eq!(run(schema, &documents), run(schema, &documents));
}
