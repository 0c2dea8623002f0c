use crate::*;

const FLOWCHART_SUBGRAPH: &str = include_str!("../../../../fixtures/svg/flowchart_subgraph.svg");

fn summary(positions: &[ComponentPosition]) -> Vec<(&str, &str, u32, u32)> {
    positions
        .iter()
        .map(|p| (p.id.as_str(), p.label.as_str(), p.x, p.y))
        .collect()
}

#[test]
fn mermaid_flowchart_components_land_on_full_hd_raster() {
    let out = extract_positions(FLOWCHART_SUBGRAPH, &ExtractOptions::default()).expect("extract");
    assert_eq!(
        summary(&out),
        vec![
            ("Backend", "Backend", 1310, 713),
            ("Web", "Web App", 326, 209),
            ("API", "API Server", 1310, 569),
            ("Db", "Orders DB", 1502, 749),
        ]
    );
}

#[test]
fn mermaid_flowchart_scales_with_output_size() {
    let out = extract_positions(FLOWCHART_SUBGRAPH, &ExtractOptions::with_size(400, 300))
        .expect("extract");
    assert_eq!(
        summary(&out),
        vec![
            ("Backend", "Backend", 273, 198),
            ("Web", "Web App", 68, 58),
            ("API", "API Server", 273, 158),
            ("Db", "Orders DB", 313, 208),
        ]
    );
}

#[test]
fn positions_serialize_as_plain_records() {
    let out = extract_positions(FLOWCHART_SUBGRAPH, &ExtractOptions::default()).expect("extract");
    let json = serde_json::to_value(&out[1]).expect("json");
    assert_eq!(
        json,
        serde_json::json!({ "id": "Web", "label": "Web App", "x": 326, "y": 209 })
    );
}
