use mentor_match::config::Settings;
use mentor_match::{MatchAssemblerCoordinator, Person, Supplier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Both sides of a mentoring programme, as read from disk
#[derive(Debug, Deserialize)]
struct Population {
    mentees: Vec<Person>,
    mentors: Vec<Person>,
}

#[derive(Debug, Serialize)]
struct MatchLine {
    mentee: String,
    mentor: String,
    cost: i32,
}

fn demo_person(
    first_name: &str,
    last_name: &str,
    year: i32,
    activities: &[&str],
    english: bool,
) -> Person {
    Person {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        year,
        activities: activities.iter().map(|a| a.to_string()).collect(),
        motivations: BTreeSet::new(),
        english,
    }
}

fn demo_population() -> Population {
    Population {
        mentees: vec![
            demo_person("Alice", "Martin", 2024, &["finance"], false),
            demo_person("Bruno", "Petit", 2024, &["law", "consulting"], true),
            demo_person("Chloe", "Durand", 2025, &["research"], false),
            demo_person("Denis", "Leroy", 2023, &["industry"], true),
        ],
        mentors: vec![
            demo_person("Xavier", "Moreau", 2014, &["law"], true),
            demo_person("Yasmine", "Simon", 2014, &["finance"], false),
            demo_person("Zoe", "Laurent", 2015, &["research", "industry"], false),
        ],
    }
}

async fn read_population(path: Option<String>) -> Result<Population, String> {
    match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| format!("cannot read {}: {}", path, e))?;
            serde_json::from_str(&raw).map_err(|e| format!("invalid population in {}: {}", path, e))
        }
        None => Ok(demo_population()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.logging.level))
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Mentor Match...");

    // Both sides come from the same source, read once
    let population = Supplier::spawn(read_population(std::env::args().nth(1)));
    let mentees = {
        let population = population.clone();
        Supplier::spawn(async move {
            population
                .resolve()
                .await
                .map(|p| p.mentees.clone())
                .map_err(|e| e.to_string())
        })
    };
    let mentors = Supplier::spawn(async move {
        population
            .resolve()
            .await
            .map(|p| p.mentors.clone())
            .map_err(|e| e.to_string())
    });

    let coordinator = MatchAssemblerCoordinator::from_settings(&settings.coordinator);
    coordinator.set_mentees_supplier(mentees);
    coordinator.set_mentors_supplier(mentors);
    coordinator.set_criteria_supplier(Supplier::ready(Person::default_criteria()));
    if settings.matching.use_placeholders {
        let placeholder = Person::placeholder(settings.matching.placeholder_name.as_str());
        coordinator.set_placeholder_suppliers(
            Some(Supplier::ready(placeholder.clone())),
            Some(Supplier::ready(placeholder)),
        )?;
    }

    let assembler = coordinator.get().await.map_err(|e| {
        error!("Failed to assemble inputs: {}", e);
        e
    })?;
    let matches = assembler.build().map_err(|e| {
        error!("Failed to build matches: {}", e);
        e
    })?;

    info!(
        "Built {} matches with a total cost of {}",
        matches.len(),
        matches.total_cost()
    );

    let lines: Vec<MatchLine> = matches
        .iter()
        .map(|m| MatchLine {
            mentee: m.mentee().full_name(),
            mentor: m.mentor().full_name(),
            cost: m.cost(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&lines)?);

    Ok(())
}
