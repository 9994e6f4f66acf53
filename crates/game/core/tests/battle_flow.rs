use battle_core::{
    AbilityCatalog, AbilityDefinition, AiPattern, BattleConfig, BattleEngine, BattlePhase,
    BattleState, BonusKind, Combatant, CombatantId, CompanionProfile, Command, Controller,
    DeclineReason, Difficulty, EffectDefinition, EffectKindTag, EffectTarget, EscapeOutcome,
    ExecuteError, InvalidAction, LogKind, Mood, Outcome, RewardContext, ScriptedRng, Side,
    StatKind, Stats, StatusEffect, StatusKind, Tier, Trigger, TurnError, TurnPrompt,
    compute_rewards, process_companion_turn,
};

const SLIME: CombatantId = CombatantId(1);

fn hero() -> Combatant {
    Combatant::new(
        CombatantId::PLAYER,
        "Hero",
        Side::Player,
        Stats {
            attack: 50,
            defense: 10,
            speed: 20,
            ..Stats::default()
        },
    )
    .with_level(5)
    .with_abilities(["power_strike".into()])
}

fn slime(hp: u32) -> Combatant {
    Combatant::new(
        SLIME,
        "Slime",
        Side::Enemy,
        Stats {
            hp,
            max_hp: hp,
            attack: 10,
            defense: 10,
            speed: 5,
            ..Stats::default()
        },
    )
    .with_level(5)
    .with_ai(AiPattern::Aggressive)
}

fn catalog() -> AbilityCatalog {
    AbilityCatalog::from_definitions([AbilityDefinition {
        id: "power_strike".into(),
        name: "Power Strike".into(),
        trigger: Trigger::Manual,
        chance: 1.0,
        cooldown: 2,
        effects: vec![EffectDefinition::new(
            EffectKindTag::Damage,
            EffectTarget::Enemy,
            2.0,
        )],
    }])
    .expect("valid catalog")
}

fn expect_actor(engine: &mut BattleEngine<'_>) -> CombatantId {
    match engine.prepare_next_turn().expect("battle running") {
        TurnPrompt::Act { actor, .. } => actor,
        TurnPrompt::Finished(outcome) => panic!("battle ended early: {outcome}"),
    }
}

#[test]
fn actions_before_start_are_rejected() {
    let mut state = BattleState::new([hero(), slime(100)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);

    assert!(engine.prepare_next_turn().is_err());
    assert_eq!(
        engine.execute(CombatantId::PLAYER, Command::Defend),
        Err(ExecuteError::NotStarted)
    );
}

#[test]
fn faster_combatant_acts_first() {
    let mut state = BattleState::new([hero(), slime(100)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    assert_eq!(engine.turn_order(), vec![CombatantId::PLAYER, SLIME]);
    assert_eq!(
        engine.prepare_next_turn(),
        Ok(TurnPrompt::Act {
            actor: CombatantId::PLAYER,
            controller: Controller::Player
        })
    );
    // Asking again before executing returns the same actor.
    assert_eq!(expect_actor(&mut engine), CombatantId::PLAYER);
    assert_eq!(
        engine.execute(SLIME, Command::Defend),
        Err(ExecuteError::NotCurrentActor {
            actor: SLIME,
            current: Some(CombatantId::PLAYER)
        })
    );
}

#[test]
fn one_shot_victory_earns_bonuses() {
    let mut state = BattleState::new([hero(), slime(40)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let mut controller = |_: &BattleState, _: CombatantId| Command::Attack { target: SLIME };
    let outcome = engine.run_to_end(&mut controller).expect("battle runs");
    assert_eq!(outcome, Outcome::Victory);
    assert_eq!(state.phase, BattlePhase::Victory);
    assert_eq!(state.summary.rounds, 1);
    assert_eq!(state.summary.damage_taken, 0);

    let bundle = compute_rewards(
        outcome,
        &state,
        Difficulty::Normal,
        &RewardContext::default(),
        &config,
        &mut rng,
    );
    // 70 exp and 35 gold, × 1.5 perfect × 1.2 speed
    assert_eq!(bundle.exp, 126);
    assert_eq!(bundle.gold, 63);
    let kinds: Vec<BonusKind> = bundle.bonuses.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BonusKind::PerfectVictory, BonusKind::SpeedBonus]);
}

#[test]
fn poison_and_defend_over_three_rounds() {
    let mut state = BattleState::new([hero(), slime(100)]);
    state.ledger.apply(
        SLIME,
        StatusEffect::new(StatusKind::Poison, 5.0, 3, CombatantId::PLAYER),
    );
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    for _ in 0..3 {
        let hero_id = expect_actor(&mut engine);
        engine.execute(hero_id, Command::Defend).expect("defend");
        let enemy = expect_actor(&mut engine);
        assert_eq!(enemy, SLIME);
        engine.execute_auto(enemy).expect("ai turn");
    }
    expect_actor(&mut engine);

    assert_eq!(state.round, 4);
    assert_eq!(state.combatant(SLIME).map(|c| c.stats.hp), Some(85));
    assert!(!state.ledger.has(SLIME, StatusKind::Poison));
    // 10 atk - 5 = 5, halved while defending
    assert_eq!(
        state.combatant(CombatantId::PLAYER).map(|c| c.stats.hp),
        Some(94)
    );
    assert_eq!(state.log.count(LogKind::DamageOverTime), 3);
}

#[test]
fn stun_skips_exactly_one_turn() {
    let mut state = BattleState::new([hero(), slime(500)]);
    state.ledger.apply(
        SLIME,
        StatusEffect::new(StatusKind::Stun, 0.0, 1, CombatantId::PLAYER),
    );
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let actor = expect_actor(&mut engine);
    engine
        .execute(actor, Command::Defend)
        .expect("defend");
    // The slime is stunned, so the next actor is the hero in round 2.
    assert_eq!(expect_actor(&mut engine), CombatantId::PLAYER);
    assert_eq!(engine.state().round, 2);
    engine
        .execute(CombatantId::PLAYER, Command::Defend)
        .expect("defend");
    assert_eq!(expect_actor(&mut engine), SLIME);
    assert_eq!(state.log.count(LogKind::Incapacitated), 1);
}

#[test]
fn invalid_command_forfeits_the_turn() {
    let mut state = BattleState::new([hero(), slime(100)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let actor = expect_actor(&mut engine);
    let report = engine
        .execute(
            actor,
            Command::Attack {
                target: CombatantId::PLAYER,
            },
        )
        .expect("forfeit is not an error");
    assert_eq!(
        report.forfeited,
        Some(InvalidAction::InvalidTarget {
            target: CombatantId::PLAYER
        })
    );
    assert_eq!(expect_actor(&mut engine), SLIME);

    engine.execute_auto(SLIME).expect("ai turn");
    let actor = expect_actor(&mut engine);
    let report = engine.execute(actor, Command::Item).expect("forfeit");
    assert_eq!(report.forfeited, Some(InvalidAction::NoItems { actor }));
    assert_eq!(state.log.count(LogKind::InvalidAction), 2);
}

#[test]
fn skill_cooldown_blocks_reuse_until_it_expires() {
    let mut state = BattleState::new([hero(), slime(1000)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let strike = || Command::Skill {
        ability: "power_strike".into(),
        target: Some(SLIME),
    };

    let hero_id = expect_actor(&mut engine);
    let report = engine.execute(hero_id, strike()).expect("skill");
    assert!(report.ability.as_ref().is_some_and(|a| a.success));
    // 50 × 2 - 5
    assert_eq!(report.ability.map(|a| a.damage()), Some(95));

    let actor = expect_actor(&mut engine);
    engine.execute_auto(actor).expect("ai");
    let hero_id = expect_actor(&mut engine);
    let report = engine.execute(hero_id, strike()).expect("forfeit");
    assert!(matches!(
        report.forfeited,
        Some(InvalidAction::AbilityNotReady { remaining: 1, .. })
    ));

    let actor = expect_actor(&mut engine);
    engine.execute_auto(actor).expect("ai");
    let hero_id = expect_actor(&mut engine);
    let report = engine.execute(hero_id, strike()).expect("skill");
    assert!(report.forfeited.is_none());
}

#[test]
fn bosses_refuse_escape() {
    let mut state = BattleState::new([hero(), slime(100).with_tier(Tier::Boss)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.0);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let actor = expect_actor(&mut engine);
    let report = engine.execute(actor, Command::Escape).expect("declined");
    assert_eq!(
        report.escape,
        Some(EscapeOutcome::Declined(DeclineReason::Inescapable))
    );
    assert_eq!(state.phase, BattlePhase::Battle);
    assert_eq!(state.escape.attempts, 0);
}

#[test]
fn failed_escape_starts_a_cooldown() {
    let mut state = BattleState::new([hero(), slime(100)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::with_fallback([0.99], 0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let actor = expect_actor(&mut engine);
    let report = engine.execute(actor, Command::Escape).expect("attempt");
    assert!(matches!(report.escape, Some(EscapeOutcome::Failed { .. })));

    let actor = expect_actor(&mut engine);
    engine.execute_auto(actor).expect("ai");
    let actor = expect_actor(&mut engine);
    let report = engine.execute(actor, Command::Escape).expect("declined");
    assert_eq!(
        report.escape,
        Some(EscapeOutcome::Declined(DeclineReason::Cooldown { rounds: 1 }))
    );
}

#[test]
fn successful_escape_ends_the_battle() {
    let mut state = BattleState::new([hero(), slime(100)]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::with_fallback([0.0], 0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    let actor = expect_actor(&mut engine);
    let report = engine.execute(actor, Command::Escape).expect("attempt");
    assert_eq!(report.outcome, Some(Outcome::Escaped));
    assert_eq!(
        engine.prepare_next_turn(),
        Ok(TurnPrompt::Finished(Outcome::Escaped))
    );

    let bundle = compute_rewards(
        Outcome::Escaped,
        &state,
        Difficulty::Normal,
        &RewardContext { first_time: true },
        &config,
        &mut rng,
    );
    assert!(bundle.is_empty());
}

#[test]
fn boss_phase_never_regresses_after_healing() {
    let mut boss = slime(100).with_ai(AiPattern::Boss);
    boss.stats.hp = 60;
    let mut state = BattleState::new([hero(), boss]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);

    {
        let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
        engine.start().expect("start");
        let actor = expect_actor(&mut engine);
        engine
            .execute(actor, Command::Defend)
            .expect("defend");
        let boss_turn = expect_actor(&mut engine);
        assert_eq!(boss_turn, SLIME);
        engine.execute_auto(boss_turn).expect("boss turn");
    }
    assert_eq!(state.boss_phases.get(&SLIME).map(|t| t.index()), Some(1));

    if let Some(boss) = state.combatant_mut(SLIME) {
        boss.stats.hp = 90;
    }
    {
        let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
        let actor = expect_actor(&mut engine);
        engine
            .execute(actor, Command::Defend)
            .expect("defend");
        assert_eq!(expect_actor(&mut engine), SLIME);
    }
    assert_eq!(state.boss_phases.get(&SLIME).map(|t| t.index()), Some(1));
    assert_eq!(state.summary.phases_completed, 1);
    assert_eq!(state.log.count(LogKind::PhaseChange), 1);
}

#[test]
fn tired_companion_moves_by_mood_speed() {
    let fox = CompanionProfile {
        id: "fox".into(),
        name: "Fox".into(),
        level: 3,
        element: Default::default(),
        base_stats: Stats {
            attack: 20,
            defense: 10,
            speed: 20,
            ..Stats::default()
        },
        mood: Mood::Tired,
        loyalty: 50,
        exp: 0,
        abilities: Vec::new(),
    };
    let companion = fox.to_combatant(CombatantId(2));
    assert_eq!(companion.stats.speed, 12);

    let mut hero = hero();
    hero.stats.speed = 10;
    let mut enemy = slime(100);
    enemy.stats.speed = 11;
    let mut state = BattleState::new([hero, enemy, companion]);
    let (catalog, config) = (catalog(), BattleConfig::default());
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    assert_eq!(
        engine.turn_order(),
        vec![CombatantId(2), SLIME, CombatantId::PLAYER]
    );
    assert_eq!(
        engine.prepare_next_turn(),
        Ok(TurnPrompt::Act {
            actor: CombatantId(2),
            controller: Controller::Companion
        })
    );

    let turn = process_companion_turn(&mut engine, CombatantId(2)).expect("companion turn");
    // 20 × 0.7 = 14 attack, minus 10 × 0.5
    assert_eq!(turn.enemies[0].hp, 91);
    assert_eq!(turn.companion_hp, 100);
    assert!(turn.animations.iter().any(|a| a.kind == LogKind::Hit));
}

#[test]
fn round_limit_is_reported_without_extra_ticks() {
    let mut state = BattleState::new([hero(), slime(500)]);
    state.ledger.apply(
        SLIME,
        StatusEffect::new(StatusKind::Buff, 1.2, 3, SLIME).with_stat(StatKind::Attack),
    );
    let catalog = catalog();
    let mut config = BattleConfig::default();
    config.limits.max_rounds = 1;
    let mut rng = ScriptedRng::constant(0.5);
    let mut engine = BattleEngine::new(&mut state, &catalog, &config, &mut rng);
    engine.start().expect("start");

    assert_eq!(expect_actor(&mut engine), CombatantId::PLAYER);
    engine
        .execute(
            CombatantId::PLAYER,
            Command::Skill {
                ability: "power_strike".into(),
                target: Some(SLIME),
            },
        )
        .expect("hero acts");
    assert_eq!(expect_actor(&mut engine), SLIME);
    engine.execute(SLIME, Command::Defend).expect("slime acts");

    for _ in 0..3 {
        assert_eq!(
            engine.prepare_next_turn(),
            Err(TurnError::RoundLimit { limit: 1 })
        );
    }

    assert_eq!(state.round, 1);
    assert_eq!(
        state
            .cooldowns
            .remaining(CombatantId::PLAYER, &"power_strike".into()),
        1
    );
    assert_eq!(state.ledger.effects(SLIME)[0].duration, 2);
}
