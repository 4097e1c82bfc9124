use covtrend::run_main;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_main(
        "covtrend",
        "Coverage-vs-time curves with confidence bounds for repeated fuzzing campaigns",
    )
    .await?;
    Ok(())
}
