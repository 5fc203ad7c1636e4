//! Fixed timestep session tick
//!
//! Advances the session one step at a time and resolves encounters. All
//! mutation happens synchronously inside these calls.

use super::collision::{decay_cooldowns, find_encounter};
use super::entity::{Combatant, MonsterKind, Movement};
use super::state::{Encounter, GamePhase, GameSession};
use crate::consts::*;

/// Discrete commands from the input shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the menu and begin a run
    Start,
    /// Pick the option at this index (0-based)
    Answer(usize),
    /// Start over after game over or victory
    Restart,
    Quit,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys (only applied while playing)
    pub movement: Movement,
    /// One-shot command, dispatched before the step
    pub command: Option<Command>,
}

/// How an answered or expired question turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Monster killed and removed
    Defeated { reward: u32, leveled_up: bool },
    /// Final boss killed
    Victory,
    /// Wrong answer or timeout, player survived the hit
    Damaged { damage: u32 },
    /// The hit cost a life; health refilled
    LifeLost { lives_left: u32 },
    /// The hit cost the last life
    GameOver,
}

/// Result of dispatching a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Not valid in the current phase (or bad option index)
    Ignored,
    Started,
    Answered(AnswerOutcome),
    Quit,
}

/// What happened during one call to [`GameSession::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub command: Option<CommandResult>,
    pub phase: GamePhase,
}

impl TickReport {
    pub fn quit_requested(&self) -> bool {
        self.command == Some(CommandResult::Quit)
    }
}

impl GameSession {
    /// Dispatch input, move the player, then advance one step
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let command = input.command.map(|c| self.handle_command(c));

        if self.phase == GamePhase::Playing && !input.movement.is_idle() {
            let arena = self.settings.arena();
            self.player.apply_movement(input.movement, arena);
        }

        self.update();

        TickReport {
            command,
            phase: self.phase,
        }
    }

    /// Apply a command if the current phase allows it
    pub fn handle_command(&mut self, command: Command) -> CommandResult {
        match (command, self.phase) {
            (Command::Quit, _) => CommandResult::Quit,
            (Command::Start, GamePhase::Menu) => {
                let name = self.settings.player_name.clone();
                self.start_game(&name);
                CommandResult::Started
            }
            (Command::Restart, phase) if phase.is_terminal() => {
                let name = self.player.character.name.clone();
                self.start_game(&name);
                CommandResult::Started
            }
            (Command::Answer(index), GamePhase::Question) => {
                let Some(value) = self.current_question().and_then(|q| q.option(index)) else {
                    log::debug!("Ignoring out-of-range option {index}");
                    return CommandResult::Ignored;
                };
                self.answer_question(value)
                    .map_or(CommandResult::Ignored, CommandResult::Answered)
            }
            (command, phase) => {
                log::debug!("Ignoring {command:?} during {phase:?}");
                CommandResult::Ignored
            }
        }
    }

    /// Advance the session by one fixed step
    pub fn update(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                decay_cooldowns(&mut self.cooldowns);

                let target = self.player.pos();
                for monster in self.monsters.iter_mut().filter(|m| m.is_alive()) {
                    monster.move_toward(target);
                }

                self.check_collision();

                self.spawn_timer += 1;
                let alive = self.monsters.iter().filter(|m| m.is_alive()).count();
                if self.spawn_timer > SPAWN_INTERVAL_TICKS && alive < MAX_ACTIVE_MONSTERS {
                    self.spawn_monster();
                    self.spawn_timer = 0;
                }
            }
            GamePhase::Question => {
                self.question_timer = self.question_timer.saturating_sub(1);
                if self.question_timer == 0 {
                    log::debug!("Question timed out");
                    self.timeout_question();
                }
            }
            GamePhase::Menu | GamePhase::GameOver | GamePhase::Win => {}
        }
    }

    /// Start an encounter with the first monster in reach.
    /// Returns true if one started.
    pub fn check_collision(&mut self) -> bool {
        let Some(id) = find_encounter(
            self.player.pos(),
            &self.monsters,
            &self.cooldowns,
            COLLISION_DISTANCE,
        ) else {
            return false;
        };
        let Some(monster) = self.monsters.iter().find(|m| m.id == id) else {
            return false;
        };

        let question = monster.generate_question(&mut self.rng);
        log::debug!(
            "Encounter with {} (id {}): {}",
            monster.character.name,
            id,
            question.prompt()
        );
        self.encounter = Some(Encounter {
            monster_id: id,
            question,
        });
        self.phase = GamePhase::Question;
        self.cooldowns.insert(id, COLLISION_COOLDOWN_TICKS);
        self.question_timer = self.settings.question_time_ticks();
        true
    }

    /// Resolve the active encounter with a submitted value.
    /// Returns `None` when no question is being asked.
    pub fn answer_question(&mut self, submitted: i32) -> Option<AnswerOutcome> {
        if self.phase != GamePhase::Question {
            log::debug!("answer_question called during {:?}", self.phase);
            return None;
        }
        let encounter = self.encounter.take()?;

        let outcome = if encounter.question.check_answer(submitted) {
            self.resolve_correct(encounter.monster_id)
        } else {
            self.resolve_wrong(encounter.monster_id)
        };
        Some(outcome)
    }

    /// Resolve the active encounter as if answered wrong
    pub fn timeout_question(&mut self) -> Option<AnswerOutcome> {
        let encounter = self.encounter.take()?;
        Some(self.resolve_wrong(encounter.monster_id))
    }

    fn resolve_correct(&mut self, monster_id: u32) -> AnswerOutcome {
        self.question_timer = 0;
        let Some(index) = self.monsters.iter().position(|m| m.id == monster_id) else {
            self.phase = GamePhase::Playing;
            return AnswerOutcome::Defeated {
                reward: 0,
                leveled_up: false,
            };
        };

        let reward = self.monsters[index].reward_points();
        let leveled_up = self.player.gain_score(reward);

        if self.monsters[index].kind == MonsterKind::FinalBoss {
            self.phase = GamePhase::Win;
            log::info!(
                "=== {} DEFEATED THE FINAL BOSS! === score {}",
                self.player.character.name,
                self.player.score
            );
            return AnswerOutcome::Victory;
        }

        self.monsters.remove(index);
        self.cooldowns.remove(&monster_id);
        self.monsters_defeated += 1;
        self.phase = GamePhase::Playing;
        AnswerOutcome::Defeated { reward, leveled_up }
    }

    fn resolve_wrong(&mut self, monster_id: u32) -> AnswerOutcome {
        self.question_timer = 0;
        let damage = self.monster(monster_id).map_or(0, |m| m.attack());
        self.player.character.take_damage(damage);
        self.cooldowns.insert(monster_id, COLLISION_COOLDOWN_TICKS);

        if !self.player.is_alive() {
            self.player.lose_life();
            if self.player.lives == 0 {
                self.phase = GamePhase::GameOver;
                log::info!(
                    "Game over for {}: score {}, level {}",
                    self.player.character.name,
                    self.player.score,
                    self.player.level
                );
                return AnswerOutcome::GameOver;
            }
            self.phase = GamePhase::Playing;
            log::info!("Life lost, {} remaining", self.player.lives);
            return AnswerOutcome::LifeLost {
                lives_left: self.player.lives,
            };
        }

        self.phase = GamePhase::Playing;
        AnswerOutcome::Damaged { damage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::Monster;

    fn playing(seed: u64) -> GameSession {
        let mut s = GameSession::new(Settings {
            seed: Some(seed),
            ..Default::default()
        });
        s.start_game("P");
        s
    }

    /// Put the first monster on top of the player and step into an encounter
    fn enter_question(s: &mut GameSession) -> u32 {
        let pos = s.player.pos();
        s.monsters[0].character.pos = pos;
        s.update();
        assert_eq!(s.phase(), GamePhase::Question);
        s.encounter().unwrap().monster_id
    }

    fn wrong_answer(s: &GameSession) -> i32 {
        let q = s.current_question().unwrap();
        q.correct_answer() + 1000
    }

    #[test]
    fn test_collision_starts_encounter() {
        let mut s = playing(10);
        let id = enter_question(&mut s);
        assert_eq!(s.current_monster().unwrap().id, id);
        assert_eq!(s.cooldown(id), COLLISION_COOLDOWN_TICKS);
        assert_eq!(s.remaining_time(), QUESTION_TIME_SECS);
        assert_eq!(s.current_question().unwrap().options().len(), OPTION_COUNT);
    }

    #[test]
    fn test_correct_answer_removes_monster() {
        let mut s = playing(11);
        let id = enter_question(&mut s);
        assert_eq!(s.monster(id).unwrap().difficulty, 1);
        let answer = s.current_question().unwrap().correct_answer();

        let outcome = s.answer_question(answer);
        assert_eq!(
            outcome,
            Some(AnswerOutcome::Defeated {
                reward: 10,
                leveled_up: false
            })
        );
        assert!(s.monster(id).is_none());
        assert_eq!(s.monsters_defeated(), 1);
        assert_eq!(s.cooldown(id), 0);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.encounter().is_none());
        assert_eq!(s.stats().score, 10);
    }

    #[test]
    fn test_wrong_answer_damages_player() {
        let mut s = playing(12);
        let id = enter_question(&mut s);
        let outcome = s.answer_question(wrong_answer(&s));
        assert_eq!(outcome, Some(AnswerOutcome::Damaged { damage: 15 }));
        assert_eq!(s.player().health(), PLAYER_MAX_HEALTH - 15);
        assert!(s.monster(id).is_some());
        assert_eq!(s.cooldown(id), COLLISION_COOLDOWN_TICKS);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.encounter().is_none());
    }

    #[test]
    fn test_lethal_hit_costs_a_life() {
        let mut s = playing(13);
        s.player.character.set_health(5);
        enter_question(&mut s);
        let outcome = s.answer_question(wrong_answer(&s));
        assert_eq!(outcome, Some(AnswerOutcome::LifeLost { lives_left: 2 }));
        assert_eq!(s.player().health(), PLAYER_MAX_HEALTH);
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut s = playing(14);
        s.player.lives = 1;
        s.player.character.set_health(1);
        enter_question(&mut s);
        let outcome = s.answer_question(wrong_answer(&s));
        assert_eq!(outcome, Some(AnswerOutcome::GameOver));
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.encounter().is_none());

        let frozen = s.player().clone();
        let monsters = s.monsters().to_vec();
        for _ in 0..300 {
            s.update();
        }
        assert_eq!(s.player(), &frozen);
        assert_eq!(s.monsters(), monsters.as_slice());
        assert_eq!(s.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_timeout_matches_wrong_answer() {
        let mut timed_out = playing(15);
        let mut answered = playing(15);
        let id = enter_question(&mut timed_out);
        enter_question(&mut answered);

        for _ in 0..timed_out.settings().question_time_ticks() {
            timed_out.update();
        }
        answered.answer_question(wrong_answer(&answered));

        assert_eq!(timed_out.phase(), GamePhase::Playing);
        assert_eq!(timed_out.stats(), answered.stats());
        assert_eq!(timed_out.cooldown(id), answered.cooldown(id));
        assert!(timed_out.encounter().is_none());
    }

    #[test]
    fn test_countdown_reports_whole_seconds() {
        let mut s = playing(16);
        enter_question(&mut s);
        for _ in 0..61 {
            s.update();
        }
        assert_eq!(s.remaining_time(), 28);
    }

    #[test]
    fn test_timeout_without_encounter_is_noop() {
        let mut s = playing(17);
        let before = s.stats();
        assert_eq!(s.timeout_question(), None);
        assert_eq!(s.stats(), before);
    }

    #[test]
    fn test_answer_outside_question_is_noop() {
        let mut s = playing(18);
        let before = s.stats();
        assert_eq!(s.answer_question(3), None);
        assert_eq!(s.stats(), before);
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_cooldown_blocks_retrigger_until_expired() {
        let mut s = playing(19);
        let id = enter_question(&mut s);
        s.answer_question(wrong_answer(&s));

        // Monster sits on the player the whole time
        for elapsed in 1..COLLISION_COOLDOWN_TICKS {
            s.update();
            assert_eq!(s.phase(), GamePhase::Playing);
            assert_eq!(s.cooldown(id), COLLISION_COOLDOWN_TICKS - elapsed);
        }
        s.update();
        assert_eq!(s.phase(), GamePhase::Question);
        assert_eq!(s.encounter().unwrap().monster_id, id);
    }

    #[test]
    fn test_spawn_timer() {
        let mut s = playing(20);
        s.spawn_timer = SPAWN_INTERVAL_TICKS;
        s.update();
        assert_eq!(s.monsters().len(), 2);
        assert_eq!(s.spawn_timer, 0);

        s.spawn_monster();
        s.spawn_timer = SPAWN_INTERVAL_TICKS + 50;
        s.update();
        assert_eq!(s.monsters().len(), MAX_ACTIVE_MONSTERS);
        assert_eq!(s.spawn_timer, SPAWN_INTERVAL_TICKS + 51);
    }

    #[test]
    fn test_monsters_chase_player() {
        let mut s = playing(21);
        let before = s.monsters[0].pos();
        s.update();
        let after = s.monsters[0].pos();
        assert!(after.x < before.x);
        assert!(after.distance(s.player.pos()) < before.distance(s.player.pos()));
    }

    #[test]
    fn test_final_boss_victory() {
        let mut s = playing(22);
        s.player.level = MAX_LEVEL;
        let boss_id = s.spawn_monster();
        assert_eq!(s.monster(boss_id).unwrap().kind, MonsterKind::FinalBoss);

        // Keep the regular monster out of reach so the boss is the only hit
        s.monsters[0].character.pos = glam::Vec2::new(700.0, 100.0);
        let pos = s.player.pos();
        s.monsters[1].character.pos = pos;
        s.update();
        assert_eq!(s.current_monster().unwrap().id, boss_id);

        let answer = s.current_question().unwrap().correct_answer();
        assert_eq!(s.answer_question(answer), Some(AnswerOutcome::Victory));
        assert_eq!(s.phase(), GamePhase::Win);
        assert!(s.final_boss_spawned());
        assert!(s.encounter().is_none());
        assert_eq!(s.monsters().len(), 2);
        assert_eq!(s.player().level, MAX_LEVEL);
    }

    #[test]
    fn test_regular_boss_does_not_win() {
        let mut s = playing(23);
        s.final_boss_battle = true;
        s.monsters[0] = Monster::boss(s.monsters[0].id, "Boss 1", 1, s.monsters[0].pos());
        enter_question(&mut s);
        let answer = s.current_question().unwrap().correct_answer();
        let outcome = s.answer_question(answer);
        assert!(matches!(outcome, Some(AnswerOutcome::Defeated { reward: 30, .. })));
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_commands_follow_phase() {
        let mut s = GameSession::new(Settings {
            seed: Some(24),
            player_name: "Ana".into(),
            ..Default::default()
        });
        assert_eq!(s.handle_command(Command::Answer(0)), CommandResult::Ignored);
        assert_eq!(s.handle_command(Command::Restart), CommandResult::Ignored);
        assert_eq!(s.handle_command(Command::Start), CommandResult::Started);
        assert_eq!(s.player().character.name, "Ana");
        assert_eq!(s.handle_command(Command::Start), CommandResult::Ignored);

        enter_question(&mut s);
        assert_eq!(s.handle_command(Command::Answer(OPTION_COUNT)), CommandResult::Ignored);
        assert_eq!(s.phase(), GamePhase::Question);

        let correct = s.current_question().unwrap().correct_answer();
        let index = s
            .current_question()
            .unwrap()
            .options()
            .iter()
            .position(|&o| o == correct)
            .unwrap();
        assert!(matches!(
            s.handle_command(Command::Answer(index)),
            CommandResult::Answered(AnswerOutcome::Defeated { .. })
        ));
        assert_eq!(s.handle_command(Command::Quit), CommandResult::Quit);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut s = playing(25);
        s.phase = GamePhase::GameOver;
        s.player.score = 400;
        let report = s.tick(&TickInput {
            command: Some(Command::Restart),
            ..Default::default()
        });
        assert_eq!(report.command, Some(CommandResult::Started));
        assert_eq!(report.phase, GamePhase::Playing);
        assert_eq!(s.stats().score, 0);
        assert_eq!(s.player().character.name, "P");
    }

    #[test]
    fn test_tick_applies_movement_only_while_playing() {
        let mut s = playing(26);
        let start = s.player.pos();
        let right = TickInput {
            movement: Movement {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        s.tick(&right);
        assert_eq!(s.player.pos().x, start.x + PLAYER_SPEED);

        enter_question(&mut s);
        let before = s.player.pos();
        s.tick(&right);
        assert_eq!(s.player.pos(), before);

        let report = s.tick(&TickInput {
            command: Some(Command::Quit),
            ..Default::default()
        });
        assert!(report.quit_requested());
    }

    #[test]
    fn test_movement_in_undersized_arena() {
        let settings = Settings {
            seed: Some(27),
            arena_width: 30.0,
            arena_height: f32::NAN,
            ..Default::default()
        };
        let mut s = GameSession::new(settings);
        s.start_game("P");
        let left = TickInput {
            movement: Movement {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..5 {
            s.tick(&left);
        }
        assert_eq!(s.player().pos().x, ARENA_MARGIN);
        assert!(s.player().pos().y.is_finite());
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99_999);
        let mut b = playing(99_999);
        let input = TickInput {
            movement: Movement {
                down: true,
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..600 {
            let ra = a.tick(&input);
            let rb = b.tick(&input);
            assert_eq!(ra, rb);
            if a.phase() == GamePhase::Question {
                let value = a.current_question().unwrap().option(0).unwrap();
                assert_eq!(a.answer_question(value), b.answer_question(value));
            }
        }
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.monsters(), b.monsters());
    }
}
