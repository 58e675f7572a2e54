#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default()).init();
    if let Err(err) = surveyflow::run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
