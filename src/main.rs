use quizforge_lib::config::AppConfig;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = quizforge_lib::run(config).await {
        eprintln!("Error running QuizForge: {:#}", e);
        std::process::exit(1);
    }
}
