//! Bracket Generation Example
//!
//! Generates a pool play tournament, plays the pools, advances the best teams
//! into the bracket stage and prints the standings along the way.

use bracket_engine::{
    BracketResult, advance_from_pools, compute_standings, generate_bracket,
    populate_bracket_stage, record_result,
};

fn main() -> BracketResult<()> {
    println!("=== Pool Play Bracket Example ===\n");

    let teams: Vec<String> = [
        "Harbor Hawks",
        "Mill Creek",
        "North Shore",
        "Old Town",
        "Pine Ridge",
        "Riverside",
        "South Bay",
        "West End",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect();

    let mut bracket = generate_bracket(&teams, "summer-league", "pool-play-bracket", None)?;
    println!(
        "Generated {} matches over {} rounds",
        bracket.total_matches, bracket.total_rounds
    );

    // Score every pool match from the length of the team names
    let pool_matches: Vec<(String, i64, i64)> = bracket
        .matches
        .iter()
        .filter(|m| m.pool_id.is_some())
        .filter_map(|m| {
            let a = m.participant_a.as_ref()?;
            let b = m.participant_b.as_ref()?;
            let (score_a, score_b) = (a.len() as i64 * 3, b.len() as i64 * 3 + 1);
            Some((m.id.clone(), score_a, score_b))
        })
        .collect();
    for (id, score_a, score_b) in pool_matches {
        bracket = record_result(bracket, &id, score_a, score_b)?;
    }

    for pool in bracket.pools.iter().flatten() {
        let pool_matches: Vec<_> = bracket
            .matches
            .iter()
            .filter(|m| m.pool_id.as_deref() == Some(pool.id.as_str()))
            .cloned()
            .collect();
        println!("\n{}", pool.name);
        for record in compute_standings(&pool_matches) {
            println!(
                "  {:<14} {}-{}  diff {:+}",
                record.participant, record.wins, record.losses, record.point_differential
            );
        }
    }

    let advancing = advance_from_pools(&bracket, Some(2024))?;
    println!("\nAdvancing: {}", advancing.join(", "));

    let bracket = populate_bracket_stage(bracket, &advancing)?;
    println!("\nBracket stage:");
    for m in bracket.matches.iter().filter(|m| m.pool_id.is_none()) {
        println!(
            "  round {} match {}: {} vs {}",
            m.round,
            m.position,
            m.participant_a.as_deref().unwrap_or("TBD"),
            m.participant_b.as_deref().unwrap_or("TBD")
        );
    }

    Ok(())
}
