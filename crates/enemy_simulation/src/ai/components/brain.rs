//! EnemyBrain — FSM врага (perception → movement → combat → death).
//!
//! Coroutine-style "подожди N секунд" заменено накопительными таймерами:
//! `state_elapsed` растёт на delta каждый тик, `state_duration` задаётся на входе.
//! Damage intake вытесняет текущий wait — остаток времени выбрасывается.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{DispatchPolicy, EnemyState};
use crate::behavior::{AnimationId, BehaviorTable};
use crate::config::{ArchetypeConfig, PerceptionMode, RoamMode};
use crate::error::ConfigError;
use crate::health::{HealthChange, HealthDisplay, HealthTracker};
use crate::logger::{log, log_info, log_warning};
use crate::perception::{PerceptionProbe, TargetSnapshot};

/// Дистанция, на которой roam цель считается достигнутой.
pub(crate) const ARRIVAL_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FxKind {
    DeathSplash,
    HitSpark,
}

/// Символьный запрос эффекта (спавнит внешний FX слой).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxRequest {
    pub kind: FxKind,
    pub position: Vec3,
}

/// Маркер: инстанс лежит в пуле и не тикает.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dormant;

/// Результат damage intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// amount == 0
    Rejected,
    /// Враг мёртв или не активен — no-op (считается в `ignored_requests`)
    Ignored,
    /// Урон прошёл, но архетип без Hurt — состояние не меняется
    Absorbed,
    Hurt,
    Killed,
}

impl DamageOutcome {
    /// Изменилось ли здоровье.
    pub fn changed_health(&self) -> bool {
        matches!(
            self,
            DamageOutcome::Absorbed | DamageOutcome::Hurt | DamageOutcome::Killed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated,
    /// Запрос пришёл мёртвому (ещё не деактивированному) инстансу
    Ignored,
}

/// Выход одного тика.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Смещение за тик (потребляет внешняя физика)
    pub movement: Vec3,
    /// Клип текущего состояния (None — у состояния нет клипов)
    pub animation: Option<AnimationId>,
    /// Клип (пере)запущен с прошлого тика
    pub animation_restarted: bool,
    pub state: EnemyState,
    pub state_changed: bool,
    pub fx: Option<FxRequest>,
    /// Dead exit delay истёк — инстанс деактивирован, вернуть в пул
    pub despawn: bool,
}

/// FSM одного врага.
///
/// Владеет health и таймерами; config и behavior table — shared read-only.
#[derive(Component, Debug)]
pub struct EnemyBrain {
    archetype: Arc<ArchetypeConfig>,
    table: Arc<BehaviorTable>,

    active: bool,
    state: EnemyState,
    previous_state: EnemyState,
    /// Состояние в последнем TickOutput (для state_changed)
    reported_state: EnemyState,
    state_elapsed: f32,
    state_duration: f32,
    /// Edge-triggered: пассивное состояние ещё не опросило perception
    needs_dispatch: bool,

    home: Vec3,
    position: Vec3,
    forward: Vec3,
    roam_target: Option<Vec3>,
    on_point_b: bool,

    health: HealthTracker,
    animation: Option<AnimationId>,
    animation_restarted: bool,
    pending_fx: Option<FxRequest>,
    /// Hurt уже вошёл в этом окне тика
    hurt_latched: bool,
    despawn_signalled: bool,
    ignored_requests: u32,
}

impl EnemyBrain {
    /// Dormant инстанс (до `activate`).
    pub fn new(archetype: Arc<ArchetypeConfig>, table: Arc<BehaviorTable>) -> Self {
        let initial = archetype.initial_state;
        let max_health = archetype.max_health;

        Self {
            archetype,
            table,
            active: false,
            state: initial,
            previous_state: initial,
            reported_state: initial,
            state_elapsed: 0.0,
            state_duration: 0.0,
            needs_dispatch: true,
            home: Vec3::ZERO,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            roam_target: None,
            on_point_b: false,
            health: HealthTracker::new(max_health),
            animation: None,
            animation_restarted: false,
            pending_fx: None,
            hurt_latched: false,
            despawn_signalled: false,
            ignored_requests: 0,
        }
    }

    pub fn with_display(mut self, display: Box<dyn HealthDisplay>) -> Self {
        self.health.attach_display(display);
        self
    }

    /// Активировать (или переактивировать pooled) инстанс в `home`.
    ///
    /// Конфигурация проверяется здесь: битый архетип не активируется.
    pub fn activate<R: Rng + ?Sized>(
        &mut self,
        home: Vec3,
        rng: &mut R,
    ) -> Result<Activation, ConfigError> {
        if self.active && self.state.is_terminal() {
            self.ignored_requests += 1;
            log_warning(&format!(
                "{}: activation ignored, instance is dying",
                self.archetype.name
            ));
            return Ok(Activation::Ignored);
        }

        self.archetype.validate()?;
        self.table.validate(&self.archetype.states)?;

        self.active = true;
        self.despawn_signalled = false;
        self.hurt_latched = false;
        self.pending_fx = None;
        self.home = home;
        self.position = home;
        self.roam_target = None;
        self.on_point_b = false;
        self.health.reset(self.archetype.max_health);

        let initial = self.archetype.initial_state;
        self.state = initial;
        self.previous_state = initial;
        self.reported_state = initial;
        self.run_entry(rng);

        log_info(&format!(
            "{}: activated at {:?} in {:?}",
            self.archetype.name, home, initial
        ));
        Ok(Activation::Activated)
    }

    /// Вернуть в dormant (pooled) без смены состояния.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.roam_target = None;
    }

    /// Шаг FSM.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        target: Option<&TargetSnapshot>,
        rng: &mut R,
    ) -> TickOutput {
        let start = self.position;

        // Время не прошло (или пошло назад) — ни таймеров, ни движения
        if delta.is_nan() || delta <= 0.0 {
            return self.finish(start, false);
        }

        self.hurt_latched = false;

        if !self.active {
            return self.finish(start, false);
        }

        self.state_elapsed += delta;

        if self.state.is_terminal() {
            let mut despawn = false;
            if !self.despawn_signalled && self.state_elapsed >= self.state_duration {
                self.despawn_signalled = true;
                self.active = false;
                despawn = true;
                log_info(&format!("{}: death delay elapsed, despawn", self.archetype.name));
            }
            return self.finish(start, despawn);
        }

        let poll = match self.archetype.dispatch {
            DispatchPolicy::Continuous => true,
            DispatchPolicy::EdgeTriggered => self.needs_dispatch,
        };
        if self.state.is_passive() {
            self.needs_dispatch = false;
        }

        let next = match self.state {
            EnemyState::Idle => {
                if let Some(noticed) = self.sense_if(poll, target) {
                    Some(noticed)
                } else if self.timer_expired() {
                    if rng.gen_bool(self.archetype.roam_chance) {
                        Some(self.archetype.roam_state())
                    } else {
                        Some(EnemyState::Idle)
                    }
                } else {
                    None
                }
            }

            EnemyState::Walk | EnemyState::Patrol => match self.sense_if(poll, target) {
                Some(noticed) => Some(noticed),
                None => self.roam_step(delta),
            },

            EnemyState::SensePlayer => self.timer_expired().then_some(EnemyState::Chase),

            EnemyState::Chase => self.chase_step(delta, target),

            EnemyState::Attack => {
                if let Some(target) = target {
                    self.face(target.position);
                }
                if self.timer_expired() {
                    if self.within_attack(target) {
                        Some(EnemyState::Attack)
                    } else {
                        Some(EnemyState::Idle)
                    }
                } else {
                    None
                }
            }

            EnemyState::Hurt => self.timer_expired().then_some(EnemyState::Idle),

            EnemyState::Dead => None,
        };

        if let Some(next) = next {
            self.transition(next, rng);
        }

        self.finish(start, false)
    }

    /// Damage intake (от weapon / attack trigger).
    ///
    /// Летальный урон — немедленно Dead. Нелетальный — Hurt (если подключён),
    /// но не чаще одного входа за окно тика: урон суммируется, решение одно.
    pub fn apply_damage<R: Rng + ?Sized>(&mut self, amount: u32, rng: &mut R) -> DamageOutcome {
        if !self.active || self.state.is_terminal() {
            self.ignored_requests += 1;
            log_warning(&format!(
                "{}: damage {} ignored ({})",
                self.archetype.name,
                amount,
                if self.active { "dead" } else { "dormant" }
            ));
            return DamageOutcome::Ignored;
        }

        match self.health.apply_damage(amount) {
            HealthChange::Rejected => DamageOutcome::Rejected,
            HealthChange::Ignored => {
                self.ignored_requests += 1;
                DamageOutcome::Ignored
            }
            HealthChange::Died => {
                self.transition(EnemyState::Dead, rng);
                DamageOutcome::Killed
            }
            HealthChange::Damaged { .. } => {
                if !self.archetype.wires(EnemyState::Hurt) {
                    return DamageOutcome::Absorbed;
                }
                if !self.hurt_latched {
                    self.hurt_latched = true;
                    self.transition(EnemyState::Hurt, rng);
                }
                DamageOutcome::Hurt
            }
        }
    }

    // --- Accessors ---

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn previous_state(&self) -> EnemyState {
        self.previous_state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn archetype(&self) -> &ArchetypeConfig {
        &self.archetype
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    pub fn animation(&self) -> Option<&AnimationId> {
        self.animation.as_ref()
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Синхронизация с внешней физикой (она authoritative для позиции).
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn face_towards(&mut self, point: Vec3) {
        self.face(point);
    }

    pub fn roam_target(&self) -> Option<Vec3> {
        self.roam_target
    }

    pub fn state_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    /// Сколько damage/activation запросов пришло в терминальном/dormant состоянии.
    pub fn ignored_requests(&self) -> u32 {
        self.ignored_requests
    }

    // --- Internals ---

    fn transition<R: Rng + ?Sized>(&mut self, next: EnemyState, rng: &mut R) {
        if self.state.is_terminal() {
            return;
        }

        if next != self.state {
            log(&format!(
                "{}: {:?} → {:?}",
                self.archetype.name, self.state, next
            ));
        }

        self.previous_state = self.state;
        self.state = next;
        self.run_entry(rng);
    }

    /// Entry action текущего состояния (в т.ч. при re-entry).
    fn run_entry<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state_elapsed = 0.0;
        self.needs_dispatch = true;

        // Клип перевыбирается на каждом входе, не на каждом тике
        let picked = self.table.pick_random(self.state, rng).cloned();
        self.animation = match picked {
            Ok(clip) => Some(clip),
            Err(err) => {
                log_warning(&format!("{}: {}", self.archetype.name, err));
                None
            }
        };
        self.animation_restarted = true;

        let archetype = Arc::clone(&self.archetype);
        self.state_duration = match self.state {
            EnemyState::Idle => archetype.idle_duration.sample(rng),
            EnemyState::Walk | EnemyState::Patrol => {
                let goal = self.next_roam_target(&archetype.roam, rng);
                self.roam_target = Some(goal);
                self.face(goal);
                archetype
                    .roam_duration
                    .map(|range| range.sample(rng))
                    .unwrap_or(f32::INFINITY)
            }
            EnemyState::SensePlayer => archetype.sense_delay,
            EnemyState::Chase => f32::INFINITY,
            EnemyState::Attack => archetype.attack_wait,
            EnemyState::Hurt => archetype.hurt_delay,
            EnemyState::Dead => {
                self.roam_target = None;
                self.pending_fx = Some(FxRequest {
                    kind: FxKind::DeathSplash,
                    position: self.position,
                });
                archetype.death_delay
            }
        };
    }

    fn next_roam_target<R: Rng + ?Sized>(&self, roam: &RoamMode, rng: &mut R) -> Vec3 {
        match roam {
            RoamMode::Wander { offset } => {
                self.home
                    + Vec3::new(
                        rng.gen_range(-offset..=*offset),
                        0.0,
                        rng.gen_range(-offset..=*offset),
                    )
            }
            RoamMode::Checkpoints { .. } => self.checkpoint_goal(roam),
        }
    }

    fn checkpoint_goal(&self, roam: &RoamMode) -> Vec3 {
        match roam {
            RoamMode::Checkpoints { a, b } => {
                let goal = Vec3::from_array(if self.on_point_b { *a } else { *b });
                // Высоту держим свою — checkpoint'ы задаются на плоскости
                Vec3::new(goal.x, self.position.y, goal.z)
            }
            RoamMode::Wander { .. } => self.roam_target.unwrap_or(self.home),
        }
    }

    fn sense_if(&self, poll: bool, target: Option<&TargetSnapshot>) -> Option<EnemyState> {
        if poll {
            self.sense(target?)
        } else {
            None
        }
    }

    fn sense(&self, target: &TargetSnapshot) -> Option<EnemyState> {
        match &self.archetype.perception {
            PerceptionMode::Distance { sense_distance } => {
                let distance = PerceptionProbe::distance_to(self.position, target.position);
                (distance <= *sense_distance).then(|| self.archetype.notice_state())
            }
            PerceptionMode::Volumetric {
                radius,
                max_range,
                target_layers,
            } => {
                let hit = PerceptionProbe::volumetric_cast(
                    self.position,
                    self.forward,
                    *radius,
                    *max_range,
                    *target_layers,
                    std::slice::from_ref(target),
                )?;

                // Near radius = attack_distance: Attack только в пределах досягаемости
                let distance = PerceptionProbe::distance_to(self.position, hit.target_position);
                if distance <= self.archetype.attack_distance {
                    Some(EnemyState::Attack)
                } else {
                    Some(EnemyState::Chase)
                }
            }
        }
    }

    fn roam_step(&mut self, delta: f32) -> Option<EnemyState> {
        let archetype = Arc::clone(&self.archetype);

        if let Some(goal) = self.roam_target {
            self.step_towards(goal, archetype.move_speed * delta);

            if self.position.distance(goal) < ARRIVAL_EPSILON {
                if let RoamMode::Checkpoints { .. } = archetype.roam {
                    // Разворот: следующий leg, новый forward → новый cast
                    self.on_point_b = !self.on_point_b;
                    let next_goal = self.checkpoint_goal(&archetype.roam);
                    self.roam_target = Some(next_goal);
                    self.face(next_goal);
                    self.needs_dispatch = true;
                }
            }
        }

        self.timer_expired().then_some(EnemyState::Idle)
    }

    fn chase_step(&mut self, delta: f32, target: Option<&TargetSnapshot>) -> Option<EnemyState> {
        let Some(target) = target else {
            return Some(EnemyState::Idle);
        };

        let distance = PerceptionProbe::distance_to(self.position, target.position);

        if distance > self.archetype.lose_sight_distance {
            Some(EnemyState::Idle)
        } else if distance <= self.archetype.attack_distance {
            self.face(target.position);
            Some(EnemyState::Attack)
        } else {
            let speed = self.archetype.chase_speed();
            self.step_towards(target.position, speed * delta);
            None
        }
    }

    fn within_attack(&self, target: Option<&TargetSnapshot>) -> bool {
        target.is_some_and(|target| {
            PerceptionProbe::distance_to(self.position, target.position)
                <= self.archetype.attack_distance
        })
    }

    fn step_towards(&mut self, goal: Vec3, max_step: f32) {
        let offset = goal - self.position;
        let distance = offset.length();

        if distance <= max_step || distance <= f32::EPSILON {
            self.position = goal;
        } else {
            self.position += offset / distance * max_step;
        }

        if distance > f32::EPSILON {
            self.forward = offset / distance;
        }
    }

    fn face(&mut self, point: Vec3) {
        let direction = (point - self.position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.forward = direction;
        }
    }

    fn timer_expired(&self) -> bool {
        self.state_elapsed >= self.state_duration
    }

    fn finish(&mut self, start: Vec3, despawn: bool) -> TickOutput {
        let state_changed = self.state != self.reported_state;
        self.reported_state = self.state;

        TickOutput {
            movement: self.position - start,
            animation: self.animation.clone(),
            animation_restarted: std::mem::take(&mut self.animation_restarted),
            state: self.state,
            state_changed,
            fx: self.pending_fx.take(),
            despawn,
        }
    }
}
