use ensip15::{Normalizer, SpecData};

fn main() -> anyhow::Result<()> {
    let spec_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/spec_mini.json".to_string());
    let normalizer = Normalizer::new(SpecData::from_json_file(spec_path)?);

    for name in ["VITALIK.eth", "a🚴‍♂️.eth", "ξabc.ξλφα"] {
        println!("input:      {name}");
        println!("normalized: {}", normalizer.normalize(name)?);
        println!("beautified: {}", normalizer.beautify(name)?);
        for t in normalizer.transformations(name)? {
            println!(
                "  {} @{}: {:?} -> {:?}",
                t.kind.code(),
                t.index,
                t.sequence,
                t.suggested
            );
        }
    }

    match normalizer.cure("a_b.bitcοin") {
        Ok(cured) => println!("cured: {} ({} fixes)", cured.cured, cured.fixes.len()),
        Err(err) => println!("not curable: {err}"),
    }
    Ok(())
}
