//! Session factory.
//!
//! [`BattleRuntime`] holds the shared, read-only content and hands out
//! independent [`BattleSession`]s. It is cheap to clone and can be shared
//! across tasks; sessions themselves are never shared.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use battle_content::ContentBundle;
use battle_core::{
    BattleState, Combatant, CombatantDefinition, CombatantId, Difficulty, RewardContext, Side,
};

use crate::api::{Result, SessionError};
use crate::rng::EntropyRng;
use crate::session::BattleSession;

/// What to fight, and with whom.
#[derive(Clone, Debug)]
pub struct SessionSpec {
    pub player: CombatantDefinition,
    pub monsters: Vec<String>,
    pub companion: Option<String>,
    pub difficulty: Difficulty,
    /// Fixed seed for a reproducible session; OS entropy when `None`.
    pub seed: Option<u64>,
    /// First clear of this encounter.
    pub first_time: bool,
    /// Overrides the content's `limits.max_rounds` for this session.
    pub max_rounds: Option<u32>,
}

impl SessionSpec {
    pub fn new(player: CombatantDefinition) -> Self {
        Self {
            player,
            monsters: Vec::new(),
            companion: None,
            difficulty: Difficulty::default(),
            seed: None,
            first_time: false,
            max_rounds: None,
        }
    }

    pub fn with_monster(mut self, id: impl Into<String>) -> Self {
        self.monsters.push(id.into());
        self
    }

    pub fn with_companion(mut self, id: impl Into<String>) -> Self {
        self.companion = Some(id.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn first_time(mut self, first_time: bool) -> Self {
        self.first_time = first_time;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

#[derive(Clone)]
pub struct BattleRuntime {
    content: Arc<ContentBundle>,
    next_session: Arc<AtomicU64>,
}

impl BattleRuntime {
    pub fn new(content: ContentBundle) -> Self {
        Self::from_shared(Arc::new(content))
    }

    pub fn from_shared(content: Arc<ContentBundle>) -> Self {
        Self {
            content,
            next_session: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn content(&self) -> &Arc<ContentBundle> {
        &self.content
    }

    /// Builds the combatants and starts the battle.
    ///
    /// The player is id 0, monsters follow in request order, and the companion
    /// (if any) comes last. Monsters are tier- and difficulty-scaled.
    pub fn start_session(&self, spec: SessionSpec) -> Result<BattleSession> {
        if spec.monsters.is_empty() {
            return Err(SessionError::NoEnemies);
        }

        let mut combatants = vec![Combatant::from_definition(
            CombatantId::PLAYER,
            Side::Player,
            &spec.player,
        )];
        for (index, monster) in spec.monsters.iter().enumerate() {
            let id = CombatantId(index as u32 + 1);
            let enemy = self
                .content
                .spawn_monster(monster, id, spec.difficulty)
                .ok_or_else(|| SessionError::UnknownMonster(monster.clone()))?;
            combatants.push(enemy);
        }

        let companion = match &spec.companion {
            Some(name) => {
                let profile = self
                    .content
                    .companion(name)
                    .cloned()
                    .ok_or_else(|| SessionError::UnknownCompanion(name.clone()))?;
                let id = CombatantId(combatants.len() as u32);
                combatants.push(profile.to_combatant(id));
                Some((id, profile))
            }
            None => None,
        };

        let mut config = self.content.config().clone();
        if let Some(limit) = spec.max_rounds {
            config.limits.max_rounds = limit;
        }

        let session_id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let mut session = BattleSession::new(
            session_id,
            Arc::clone(&self.content),
            config,
            BattleState::new(combatants),
            Box::new(EntropyRng::new(spec.seed)),
            spec.difficulty,
            companion,
            RewardContext {
                first_time: spec.first_time,
            },
        );
        session.engine().start()?;

        tracing::info!(
            session = session_id,
            monsters = ?spec.monsters,
            companion = ?spec.companion,
            difficulty = %spec.difficulty,
            seeded = spec.seed.is_some(),
            "session started"
        );
        Ok(session)
    }
}
