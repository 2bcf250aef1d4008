use spacegen::{GeneratorOptions, SpaceGenerator};
use spacegen_core::RngHandle;

const DOCUMENT: &str = "\
optimizer:
  - adam
  - sgd
learning_rate:
  type: range
  params: [0.0001, 0.01, 3]
ensemble:
  type: mixture
  components: [baseline, distilled, quantized]
  params:
    min_components: 1
    max_components: 2
    step: 0.5
    shuffle: false
";

fn main() {
    let options = GeneratorOptions {
        max_space: 1_000_000,
        save_space: true,
        seed: 4242,
    };
    let generator = SpaceGenerator::from_yaml_str(DOCUMENT, options).expect("generator");

    println!("theoretical size: {}", generator.theoretical_size());
    for row in generator.realized_rows().unwrap_or(&[]).iter().take(5) {
        println!("{}", serde_json::to_string(row).expect("row"));
    }

    let mut rng = RngHandle::from_seed(7);
    let samples = generator.sample(3, &mut rng).expect("sample");
    println!("drew {} rows from the realized space", samples.len());
}
