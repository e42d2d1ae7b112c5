use shadow_rs::ShadowBuilder;

// Build metadata behind `layered-config --version`
fn main() {
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
