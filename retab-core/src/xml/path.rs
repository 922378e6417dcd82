//! Location-path evaluation
//!
//! Supports the subset the schema vocabulary needs: absolute paths of element
//! name steps with optional 1-based positional predicates, for example
//! `/Orders/Order[2]/Amount`. Positional predicates select per parent, so
//! `/A/B[1]` is the first `B` under each `A`. This is the shape the repeater
//! stack produces when it splices iteration indices into declared paths.

use crate::error::ReportError;
use crate::xml::dom::{Element, XmlDocument, XmlNode};

/// One path step: an element name plus an optional positional predicate
struct Step<'a> {
    name: &'a str,
    position: Option<usize>,
}

/// Evaluate `location` against `document`, returning matches in document
/// order. An empty result is the defined "no data" outcome, not an error.
pub fn select<'a>(
    document: &'a XmlDocument,
    location: &str,
) -> Result<Vec<&'a Element>, ReportError> {
    let steps = parse_steps(location)?;

    let mut parents: Vec<&[XmlNode]> = vec![document.nodes()];
    let mut matched: Vec<&Element> = Vec::new();

    for step in &steps {
        matched = Vec::new();
        for children in &parents {
            let named: Vec<&Element> = children
                .iter()
                .filter_map(XmlNode::as_element)
                .filter(|element| element.name() == step.name)
                .collect();
            match step.position {
                // Positions are 1-based; [0] can be produced by splicing an
                // exhausted context and simply matches nothing.
                Some(0) => {}
                Some(position) => {
                    if let Some(element) = named.get(position - 1) {
                        matched.push(element);
                    }
                }
                None => matched.extend(named),
            }
        }
        parents = matched.iter().map(|element| element.children()).collect();
    }

    Ok(matched)
}

fn parse_steps(location: &str) -> Result<Vec<Step<'_>>, ReportError> {
    let trimmed = location.strip_prefix('/').unwrap_or(location);
    if trimmed.is_empty() {
        return Err(malformed(location, "path has no steps"));
    }
    trimmed
        .split('/')
        .map(|segment| parse_step(location, segment))
        .collect()
}

fn parse_step<'a>(location: &str, segment: &'a str) -> Result<Step<'a>, ReportError> {
    if segment.is_empty() {
        return Err(malformed(location, "empty step"));
    }
    let Some(open) = segment.find('[') else {
        return Ok(Step {
            name: segment,
            position: None,
        });
    };
    if !segment.ends_with(']') {
        return Err(malformed(location, "unterminated positional predicate"));
    }
    let name = &segment[..open];
    if name.is_empty() {
        return Err(malformed(location, "positional predicate without a name"));
    }
    let index = &segment[open + 1..segment.len() - 1];
    let position = index
        .parse::<usize>()
        .map_err(|_| malformed(location, "positional predicate is not a number"))?;
    Ok(Step {
        name,
        position: Some(position),
    })
}

fn malformed(location: &str, message: &str) -> ReportError {
    ReportError::MalformedPath {
        path: location.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::xml::dom::XmlDocument;

    const ORDERS: &str = r#"<Orders>
        <Order><Id>A</Id><Amount>3</Amount></Order>
        <Order><Id>B</Id><Amount>4</Amount></Order>
        <Order><Id>C</Id><Amount>5</Amount></Order>
    </Orders>"#;

    #[test]
    fn selects_all_matches_in_document_order() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        let ids: Vec<String> = doc
            .select("/Orders/Order/Id")
            .unwrap()
            .iter()
            .map(|e| e.inner_text())
            .collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn positional_predicate_is_one_based() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        let matches = doc.select("/Orders/Order[2]/Id").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].inner_text(), "B");
    }

    #[test]
    fn out_of_range_and_zero_positions_match_nothing() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        assert!(doc.select("/Orders/Order[4]/Id").unwrap().is_empty());
        assert!(doc.select("/Orders/Order[0]/Id").unwrap().is_empty());
    }

    #[test]
    fn missing_elements_yield_empty_not_error() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        assert!(doc.select("/Orders/Invoice").unwrap().is_empty());
        assert!(doc.select("/Nothing/Here").unwrap().is_empty());
    }

    #[test]
    fn leading_slash_is_optional() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        assert_eq!(doc.select("Orders/Order").unwrap().len(), 3);
    }

    #[test]
    fn malformed_paths_are_reported() {
        let doc = XmlDocument::parse(ORDERS).unwrap();
        assert!(doc.select("").is_err());
        assert!(doc.select("/Orders//Order").is_err());
        assert!(doc.select("/Orders/Order[x]").is_err());
        assert!(doc.select("/Orders/Order[1").is_err());
    }
}
