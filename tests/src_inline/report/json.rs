use super::*;
use crate::report::tests::sample_record;

#[test]
fn test_render_record_json() {
    let json = render_record_json(&sample_record()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["model"], "rf");
    assert_eq!(value["top_n"], 100);
    assert_eq!(value["reps"], 3);
    assert_eq!(value["num_acquired"], json!([10, 20]));
    assert_eq!(value["rewards"]["avg"][1]["mean"], 0.75);
    assert_eq!(value["rewards"]["smiles"][0]["mean"], 0.25);
    assert_eq!(value["rewards"]["scores"][0]["std"], 0.05);
}
