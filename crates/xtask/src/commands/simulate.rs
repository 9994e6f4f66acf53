//! Headless battle simulation
//!
//! Builds a session from content, lets the autopilot play the hero, and
//! prints the combat log followed by the report.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{CombatantDefinition, Difficulty, GameError, LogEntry, Stats, compute_seed};
use battle_runtime::{AutoPilotProvider, BattleReport, BattleRuntime, SessionSpec};

use crate::dirs;

/// Run a battle headlessly and print its log and report
#[derive(Parser)]
pub struct Simulate {
    /// Monster ids to fight (repeatable)
    #[arg(short, long = "monster", value_name = "ID", required = true)]
    monsters: Vec<String>,

    /// Companion id to bring along
    #[arg(short, long, value_name = "ID")]
    companion: Option<String>,

    /// easy, normal, hard or nightmare
    #[arg(long, default_value = "normal", value_parser = parse_difficulty)]
    difficulty: Difficulty,

    /// Fixed seed for a reproducible battle (entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hero level; hero stats grow with it
    #[arg(long, default_value_t = 5)]
    level: u32,

    /// Abort after this many rounds (defaults to the balance config)
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Content directory (defaults to $BATTLE_DATA_DIR or the workspace data)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    value
        .parse()
        .map_err(|_| format!("unknown difficulty '{value}'"))
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let dir = dirs::content_dir(self.data_dir)?;
        let content = Arc::new(
            ContentFactory::new(&dir)
                .load_bundle()
                .with_context(|| format!("Failed to load content from {}", dir.display()))?,
        );
        let runtime = BattleRuntime::from_shared(Arc::clone(&content));

        let mut spec = SessionSpec::new(hero(self.level)).with_difficulty(self.difficulty);
        for monster in &self.monsters {
            spec = spec.with_monster(monster);
        }
        if let Some(companion) = &self.companion {
            spec = spec.with_companion(companion);
        }
        if let Some(seed) = self.seed {
            spec = spec.with_seed(seed);
        }
        if let Some(max_rounds) = self.max_rounds {
            spec = spec.with_max_rounds(max_rounds);
        }

        let mut session = runtime
            .start_session(spec)
            .map_err(|err| anyhow::anyhow!("[{}] {err}", err.error_code()))?;
        // The autopilot gets its own stream so it never shifts the battle's rolls.
        let pilot_seed = compute_seed(self.seed.unwrap_or_default(), session.id(), 1);
        let autopilot = AutoPilotProvider::new(content, pilot_seed);
        let report = session
            .run(&autopilot)
            .await
            .map_err(|err| anyhow::anyhow!("[{}] {err}", err.error_code()))?;

        if self.json {
            println!("{}", report.to_json()?);
        } else {
            print_log(&report.log);
            print_summary(&report);
        }
        Ok(())
    }
}

/// A plain adventurer whose stats scale with level.
fn hero(level: u32) -> CombatantDefinition {
    let level = level.max(1);
    CombatantDefinition {
        id: "hero".into(),
        name: "Hero".into(),
        level,
        tier: Default::default(),
        element: Default::default(),
        base_stats: Stats {
            max_hp: 100 + level * 20,
            attack: 15 + level * 3,
            defense: 8 + level * 2,
            speed: 12 + level,
            crit_rate: 0.05,
            ..Stats::default()
        },
        ai_pattern: None,
        abilities: vec!["power_strike".into(), "mend".into(), "war_cry".into()],
        items: 2,
        drops: Vec::new(),
    }
}

fn print_log(log: &[LogEntry]) {
    println!("{}", style("=== Combat Log ===").bold().green());
    for entry in log {
        let mut line = format!("[r{:>2}] {} {}", entry.round, entry.actor, entry.kind);
        if let Some(target) = entry.target {
            line.push_str(&format!(" -> {target}"));
        }
        if let Some(amount) = entry.amount {
            line.push_str(&format!(" ({amount})"));
        }
        if let Some(ability) = &entry.ability {
            line.push_str(&format!(" [{ability}]"));
        }
        if let Some(status) = entry.status {
            line.push_str(&format!(" <{status}>"));
        }
        if let Some(note) = &entry.note {
            line.push_str(&format!(" {note}"));
        }
        println!("  {line}");
    }
    println!();
}

fn print_summary(report: &BattleReport) {
    println!("{}", style("=== Result ===").bold().green());
    println!("  Outcome: {}", style(report.outcome).bold());
    println!("  Difficulty: {}", report.difficulty);

    let summary = &report.summary;
    println!("  Rounds: {}  Actions: {}", summary.rounds, summary.actions);
    println!(
        "  Damage dealt: {}  taken: {}",
        summary.damage_dealt, summary.damage_taken
    );
    println!(
        "  Max combo: {}  Boss phases: {}  Overkill: {}",
        summary.max_combo, summary.phases_completed, summary.overkill
    );
    println!();

    println!("{}", style("Rewards:").bold().yellow());
    println!("  Exp: {}  Gold: {}", report.rewards.exp, report.rewards.gold);
    for bonus in &report.rewards.bonuses {
        println!(
            "  Bonus {}: exp x{:.2}, gold x{:.2}",
            bonus.kind, bonus.exp_multiplier, bonus.gold_multiplier
        );
    }
    if !report.rewards.items.is_empty() {
        println!("  Items: {}", report.rewards.items.join(", "));
    }

    if let Some(companion) = &report.companion {
        println!();
        println!("{}", style("Companion:").bold().yellow());
        println!(
            "  {} +{} exp, loyalty {:+} (now {}), levels gained {}",
            companion.profile.name,
            companion.reward.exp_gained,
            companion.reward.loyalty_change,
            companion.profile.loyalty,
            companion.levels_gained
        );
    }
}
