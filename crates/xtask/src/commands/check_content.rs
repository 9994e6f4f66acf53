//! Validate content files
//!
//! Loads every table through the same loaders the runtime uses and reports
//! the first problem, or a short inventory when everything checks out.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use battle_content::ContentFactory;

use crate::dirs;

/// Load and cross-check every content file
#[derive(Parser)]
pub struct CheckContent {
    /// Content directory (defaults to $BATTLE_DATA_DIR or the workspace data)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl CheckContent {
    pub fn execute(self) -> Result<()> {
        let dir = dirs::content_dir(self.data_dir)?;
        println!("{} {}", style("Content:").bold().cyan(), dir.display());

        let bundle = ContentFactory::new(&dir).load_bundle()?;

        println!();
        println!("{}", style("Abilities:").bold().yellow());
        for ability in bundle.catalog().iter() {
            println!(
                "  {:<16} {:<18} cd {:>2}  chance {:.2}",
                ability.id.as_str(),
                ability.trigger.to_string(),
                ability.cooldown,
                ability.chance
            );
        }

        println!();
        println!("{}", style("Monsters:").bold().yellow());
        for monster in bundle.monsters() {
            println!(
                "  {:<12} lv {:>2}  {:<9} {:<7} {} abilities, {} drops",
                monster.id,
                monster.level,
                monster.tier.to_string(),
                monster.element.to_string(),
                monster.abilities.len(),
                monster.drops.len()
            );
        }

        println!();
        println!("{}", style("Companions:").bold().yellow());
        for companion in bundle.companions() {
            println!(
                "  {:<12} lv {:>2}  mood {:<7} loyalty {}",
                companion.id,
                companion.level,
                companion.mood.to_string(),
                companion.loyalty
            );
        }

        println!();
        println!("{}", style("All content is valid.").bold().green());
        Ok(())
    }
}
