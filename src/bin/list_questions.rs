use quizforge_lib::config::AppConfig;
use quizforge_lib::database::{DatabaseManager, QuestionStore};

#[tokio::main]
async fn main() {
    println!("🔧 Listing all questions in database...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ Failed to load configuration: {}", e);
            return;
        }
    };

    let db = match DatabaseManager::new(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            println!("❌ Database connection failed: {}", e);
            return;
        }
    };
    println!("✅ Connected to database");

    match db.list().await {
        Ok(questions) => {
            println!("\n📋 Found {} questions:", questions.len());
            println!("{:-<100}", "");
            println!("{:<8} {:<10} {:<8} {:<40} {:<30}", "ID", "Type", "Options", "Text", "Correct");
            println!("{:-<100}", "");

            for question in &questions {
                let correct = question
                    .correct_answers
                    .iter()
                    .filter_map(|&i| question.options.get(i))
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");

                println!(
                    "{:<8} {:<10} {:<8} {:<40} {:<30}",
                    question.id,
                    question.question_type.as_str(),
                    question.options.len(),
                    question.text.chars().take(38).collect::<String>(),
                    correct.chars().take(28).collect::<String>()
                );
            }
            println!("{:-<100}", "");
        }
        Err(e) => println!("❌ Failed to query questions: {}", e),
    }

    db.close();
}
