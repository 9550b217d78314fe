//! One arena: its entities, its update order and its cleanup pass
//!
//! A laning world hosts a single character (its `home`) plus creeps and gems.
//! The duel world hosts both characters and a mirrored set of walls.
//! Characters themselves live in the [`Roster`]; worlds only name them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::auto_attack::AutoAttackKind;
use super::character::{Character, CombatAction, Surroundings};
use super::collision::{self, Target};
use super::combatant::{Combatant, Enemy};
use super::entity::{Gem, Obstacle, Projectile, VisualEffect};
use super::state::{CharacterId, MatchEvent, Roster};
use super::tick::TickInput;
use crate::tuning::{EnemyTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldKind {
    Laning { home: CharacterId },
    Duel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub kind: WorldKind,
    pub bounds: Vec2,
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<Gem>,
    pub effects: Vec<VisualEffect>,
    /// Seconds since the world was created (drives patrol and strafe)
    pub clock: f32,
    spawn_timer: f32,
}

impl World {
    fn with_kind(kind: WorldKind, bounds: Vec2, obstacles: Vec<Obstacle>) -> Self {
        Self {
            kind,
            bounds,
            obstacles,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            effects: Vec::new(),
            clock: 0.0,
            spawn_timer: 0.0,
        }
    }

    pub fn laning(home: CharacterId, bounds: Vec2) -> Self {
        Self::with_kind(WorldKind::Laning { home }, bounds, Vec::new())
    }

    pub fn duel(bounds: Vec2, obstacles: Vec<Obstacle>) -> Self {
        Self::with_kind(WorldKind::Duel, bounds, obstacles)
    }

    /// Fresh duel arena with randomly placed wall pairs mirrored left to right
    pub fn generate_duel(tuning: &Tuning, rng: &mut SimRng) -> Self {
        let bounds = tuning.arena.duel_size;
        let p = &tuning.phases;
        // Hand-built tables skip validation; an inverted range collapses to its minimum
        let max_pairs = p.max_obstacle_pairs.max(p.min_obstacle_pairs);
        let pairs = rng.random_range(p.min_obstacle_pairs..=max_pairs);
        let max_size = p.obstacle_max_size.max(p.obstacle_min_size);
        let mut obstacles = Vec::with_capacity(pairs as usize * 2);
        for _ in 0..pairs {
            let width = rng.random_range(p.obstacle_min_size..=max_size);
            let height = rng.random_range(p.obstacle_min_size..=max_size);
            let x = rng.random::<f32>() * (bounds.x / 2.0 - width - p.obstacle_margin).max(0.0) + p.obstacle_margin;
            let y = rng.random::<f32>() * (bounds.y - height - p.obstacle_margin * 2.0).max(0.0)
                + p.obstacle_margin;
            let left = Obstacle::new(x, y, width, height);
            obstacles.push(left);
            obstacles.push(left.mirrored(bounds.x));
        }
        log::debug!("Duel arena generated with {} obstacles", obstacles.len());
        Self::duel(bounds, obstacles)
    }

    #[inline]
    pub fn is_duel(&self) -> bool {
        self.kind == WorldKind::Duel
    }

    /// Characters standing in this world
    pub fn residents(&self) -> &'static [CharacterId] {
        match self.kind {
            WorldKind::Laning {
                home: CharacterId::Player,
            } => &[CharacterId::Player],
            WorldKind::Laning {
                home: CharacterId::Rival,
            } => &[CharacterId::Rival],
            WorldKind::Duel => &CharacterId::ALL,
        }
    }

    pub fn find_nearest_enemy(&self, pos: Vec2) -> Option<&Enemy> {
        self.enemies.iter().min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
    }

    /// Advance everything in the world by `dt`
    pub fn update(
        &mut self,
        dt: f32,
        roster: &mut Roster,
        input: &TickInput,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Vec<MatchEvent> {
        self.clock += dt;
        match self.kind {
            WorldKind::Laning { home } => self.update_laning(home, dt, roster.get_mut(home), input, tuning, rng),
            WorldKind::Duel => {
                self.update_duel(dt, roster, input, tuning, rng);
                Vec::new()
            }
        }
    }

    fn surroundings(&self, threat: Option<Vec2>) -> Surroundings<'_> {
        Surroundings {
            is_duel: self.is_duel(),
            bounds: self.bounds,
            obstacles: &self.obstacles,
            threat,
            clock: self.clock,
        }
    }

    fn update_laning(
        &mut self,
        home: CharacterId,
        dt: f32,
        ch: &mut Character,
        input: &TickInput,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Vec<MatchEvent> {
        let threat = self.find_nearest_enemy(ch.pos).map(|e| e.pos);
        let actions = ch.update(dt, &self.surroundings(threat), input_for(home, input), tuning, rng);
        {
            let mut targets: Vec<Target> = self.enemies.iter_mut().map(|e| Target::neutral(e)).collect();
            for action in actions {
                carry_out(action, home, &mut targets, &mut self.projectiles, &mut self.effects);
            }
        }

        // Creeps and gems freeze while the character waits to respawn
        if !ch.is_respawning() {
            self.spawn_timer += dt;
            if self.spawn_timer > tuning.enemies.spawn_interval {
                self.spawn_enemy(&tuning.enemies, rng);
                self.spawn_timer = 0.0;
            }
            for gem in &mut self.gems {
                gem.update(dt, ch.pos);
            }
            for enemy in &mut self.enemies {
                enemy.update(dt, ch.pos, tuning.enemies.knockback_friction);
            }
        }

        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        self.update_auto_attacks(dt, home, ch);
        for effect in &mut self.effects {
            effect.update(dt);
        }

        {
            let owner_pos = ch.pos;
            let mut targets: Vec<Target> = self.enemies.iter_mut().map(|e| Target::neutral(e)).collect();
            collision::resolve_projectiles(&mut self.projectiles, &mut targets, &self.obstacles, |id| {
                (id == home).then_some(owner_pos)
            });
            collision::resolve_spheres(&mut ch.arsenal.orbiting_sphere, home, owner_pos, &mut targets);
        }

        self.cleanup_laning(home, ch, &tuning.enemies)
    }

    fn update_duel(
        &mut self,
        dt: f32,
        roster: &mut Roster,
        input: &TickInput,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) {
        for id in CharacterId::ALL {
            let threat = Some(roster.get(id.opponent()).pos);
            let actions = roster
                .get_mut(id)
                .update(dt, &self.surroundings(threat), input_for(id, input), tuning, rng);
            let opponent = roster.get_mut(id.opponent());
            let mut targets = [Target::character(id.opponent(), opponent)];
            for action in actions {
                carry_out(action, id, &mut targets, &mut self.projectiles, &mut self.effects);
            }
        }

        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        for id in CharacterId::ALL {
            self.update_auto_attacks(dt, id, roster.get_mut(id));
        }
        for effect in &mut self.effects {
            effect.update(dt);
        }

        let (player, rival) = roster.pair_mut();
        let positions = [player.pos, rival.pos];
        {
            let mut targets = [
                Target::character(CharacterId::Player, &mut *player),
                Target::character(CharacterId::Rival, &mut *rival),
            ];
            collision::resolve_projectiles(&mut self.projectiles, &mut targets, &self.obstacles, |id| {
                Some(positions[id.index()])
            });
        }
        collision::resolve_spheres(
            &mut player.arsenal.orbiting_sphere,
            CharacterId::Player,
            positions[0],
            &mut [Target::character(CharacterId::Rival, &mut *rival)],
        );
        collision::resolve_spheres(
            &mut rival.arsenal.orbiting_sphere,
            CharacterId::Rival,
            positions[1],
            &mut [Target::character(CharacterId::Player, &mut *player)],
        );

        let bounds = self.bounds;
        self.projectiles.retain(|p| !p.is_spent(bounds));
        self.effects.retain(|e| !e.is_dead());
    }

    fn update_auto_attacks(&mut self, dt: f32, id: CharacterId, ch: &mut Character) {
        for kind in &ch.owned_auto_attacks {
            match kind {
                AutoAttackKind::OrbitingSphere => ch.arsenal.orbiting_sphere.update(dt),
                AutoAttackKind::EightWayShot => {
                    let volley = ch.arsenal.eight_way_shot.update(dt, id, ch.pos);
                    self.projectiles.extend(volley);
                }
            }
        }
    }

    fn cleanup_laning(&mut self, home: CharacterId, ch: &mut Character, t: &EnemyTuning) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        let bounds = self.bounds;
        self.projectiles.retain(|p| !p.is_spent(bounds));

        let mut fallen = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_dead() {
                fallen.push(enemy.pos);
                false
            } else {
                true
            }
        });
        for pos in fallen {
            self.gems.push(Gem::new(pos, t.gem_value, t.gem_size, t.gem_speed));
            events.push(MatchEvent::EnemySlain { world: home });
        }

        let (pos, size) = (ch.pos, ch.size);
        let mut collected = 0;
        self.gems.retain(|gem| {
            if gem.reached(pos, size) {
                collected += gem.value;
                false
            } else {
                true
            }
        });
        if collected > 0 {
            ch.add_gold(collected);
            events.push(MatchEvent::GoldCollected {
                character: home,
                amount: collected,
            });
        }

        self.effects.retain(|e| !e.is_dead());
        events
    }

    fn spawn_enemy(&mut self, t: &EnemyTuning, rng: &mut SimRng) {
        let (w, h) = (self.bounds.x, self.bounds.y);
        let pos = if rng.random_bool(0.5) {
            let x = if rng.random_bool(0.5) { -t.size } else { w + t.size };
            Vec2::new(x, rng.random::<f32>() * h)
        } else {
            let y = if rng.random_bool(0.5) { -t.size } else { h + t.size };
            Vec2::new(rng.random::<f32>() * w, y)
        };
        log::debug!("Enemy spawned at ({:.0}, {:.0})", pos.x, pos.y);
        self.enemies.push(Enemy::new(pos, t));
    }

    /// Drop creeps (used when the lane is left for a duel)
    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }
}

/// Only the player character listens to live input
fn input_for(id: CharacterId, input: &TickInput) -> &TickInput {
    static IDLE: TickInput = TickInput::IDLE;
    match id {
        CharacterId::Player => input,
        CharacterId::Rival => &IDLE,
    }
}

fn carry_out(
    action: CombatAction,
    caster: CharacterId,
    targets: &mut [Target],
    projectiles: &mut Vec<Projectile>,
    effects: &mut Vec<VisualEffect>,
) {
    match action {
        CombatAction::Blast {
            origin,
            radius,
            damage,
            effect_secs,
        } => {
            let hits = collision::resolve_blast(origin, radius, damage, caster, targets);
            log::trace!("{caster:?} blast hit {hits} target(s)");
            effects.push(VisualEffect::new(origin, radius, Some(caster), effect_secs));
        }
        CombatAction::Fire(projectile) => projectiles.push(projectile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ProjectileKind;
    use crate::sim::shop::ShopKey;
    use crate::sim::state::Controller;
    use crate::sim::tick::HeldKeys;
    use rand::SeedableRng;

    fn roster(tuning: &Tuning) -> Roster {
        let center = tuning.arena.laning_size / 2.0;
        Roster::new(
            Character::new(CharacterId::Player, "Player", Controller::Human, center, tuning),
            Character::new(CharacterId::Rival, "AI", Controller::Ai, center, tuning),
        )
    }

    fn shot_at(pos: Vec2, life: f32) -> Projectile {
        Projectile {
            kind: ProjectileKind::Shot,
            pos,
            vel: Vec2::ZERO,
            size: 5.0,
            damage: 5.0,
            owner: CharacterId::Player,
            life,
            stun: 0.0,
            knockback: None,
            collided: false,
        }
    }

    #[test]
    fn test_blast_hits_enemies_in_radius() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        world.enemies.push(Enemy::new(Vec2::new(450.0, 300.0), &tuning.enemies));
        world.enemies.push(Enemy::new(Vec2::new(550.0, 300.0), &tuning.enemies));

        let hold = TickInput {
            keys: HeldKeys {
                q: true,
                ..Default::default()
            },
            ..Default::default()
        };
        world.update(0.001, &mut roster, &hold, &tuning, &mut rng);
        world.update(0.001, &mut roster, &TickInput::default(), &tuning, &mut rng);

        assert_eq!(world.enemies[0].hp, 20.0);
        assert_eq!(world.enemies[1].hp, 30.0);
        assert_eq!(world.effects.len(), 1);
        assert!(!roster.get(CharacterId::Player).skill(crate::sim::skill::SkillSlot::Q).can_use());
    }

    #[test]
    fn test_projectile_expires_and_is_removed() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        roster.get_mut(CharacterId::Player).respawn.set(100.0);
        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        world.projectiles.push(shot_at(Vec2::new(100.0, 100.0), 3.0));

        for dt in [1.0, 1.0, 0.5, 0.6] {
            world.update(dt, &mut roster, &TickInput::default(), &tuning, &mut rng);
        }
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_dead_enemy_drops_gem_which_pays_out() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        let mut dead = Enemy::new(Vec2::new(500.0, 300.0), &tuning.enemies);
        dead.hp = 0.0;
        world.enemies.push(dead);

        let events = world.update(0.001, &mut roster, &TickInput::default(), &tuning, &mut rng);
        assert_eq!(events, vec![MatchEvent::EnemySlain {
            world: CharacterId::Player
        }]);
        assert!(world.enemies.is_empty());
        assert_eq!(world.gems.len(), 1);

        // 800 px/s homing covers the ~100 px gap in 0.12 s
        let events = world.update(0.12, &mut roster, &TickInput::default(), &tuning, &mut rng);
        assert_eq!(events, vec![MatchEvent::GoldCollected {
            character: CharacterId::Player,
            amount: 10
        }]);
        assert!(world.gems.is_empty());
        assert_eq!(roster.get(CharacterId::Player).gold(), 10);
    }

    #[test]
    fn test_enemy_spawn_cadence() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        let mut rng = SimRng::seed_from_u64(11);
        let mut world = World::laning(CharacterId::Rival, tuning.arena.laning_size);
        // Keep the AI from farming the spawns during the test
        roster.get_mut(CharacterId::Rival).apply_stun(100.0);

        // Timer passes 1.0 at 1.2 and again at 2.4 (reset to 0 on each spawn)
        for _ in 0..5 {
            world.update(0.6, &mut roster, &TickInput::default(), &tuning, &mut rng);
        }
        assert_eq!(world.enemies.len(), 2);
    }

    #[test]
    fn test_enemies_spawn_just_outside_an_edge() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seed_from_u64(5);
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        for _ in 0..50 {
            world.spawn_enemy(&tuning.enemies, &mut rng);
        }
        let (w, h, s) = (world.bounds.x, world.bounds.y, tuning.enemies.size);
        for e in &world.enemies {
            let on_vertical_edge = (e.pos.x == -s || e.pos.x == w + s) && (0.0..=h).contains(&e.pos.y);
            let on_horizontal_edge = (e.pos.y == -s || e.pos.y == h + s) && (0.0..=w).contains(&e.pos.x);
            assert!(on_vertical_edge || on_horizontal_edge, "bad spawn {:?}", e.pos);
        }
    }

    #[test]
    fn test_respawning_freezes_lane() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        roster.get_mut(CharacterId::Player).respawn.set(5.0);
        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        world.enemies.push(Enemy::new(Vec2::new(0.0, 300.0), &tuning.enemies));

        world.update(2.0, &mut roster, &TickInput::default(), &tuning, &mut rng);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].pos, Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_find_nearest_enemy() {
        let tuning = Tuning::default();
        let mut world = World::laning(CharacterId::Player, tuning.arena.laning_size);
        assert!(world.find_nearest_enemy(Vec2::ZERO).is_none());
        world.enemies.push(Enemy::new(Vec2::new(300.0, 0.0), &tuning.enemies));
        world.enemies.push(Enemy::new(Vec2::new(0.0, 100.0), &tuning.enemies));
        let nearest = world.find_nearest_enemy(Vec2::ZERO).map(|e| e.pos);
        assert_eq!(nearest, Some(Vec2::new(0.0, 100.0)));
    }

    #[test]
    fn test_generated_duel_walls_are_mirrored() {
        let tuning = Tuning::default();
        for seed in 0..20 {
            let mut rng = SimRng::seed_from_u64(seed);
            let world = World::generate_duel(&tuning, &mut rng);
            assert!(world.is_duel());
            assert!(matches!(world.obstacles.len(), 2 | 4));
            for pair in world.obstacles.chunks(2) {
                let (left, right) = (pair[0], pair[1]);
                assert_eq!(right, left.mirrored(1000.0));
                assert!(left.min.x >= 150.0);
                assert!(left.max().x <= 500.0 + 1e-3);
                assert!(left.size.x >= 20.0 && left.size.x <= 120.0);
            }
        }
    }

    #[test]
    fn test_inverted_wall_ranges_collapse_to_minimum() {
        let mut tuning = Tuning::default();
        tuning.phases.min_obstacle_pairs = 2;
        tuning.phases.max_obstacle_pairs = 1;
        tuning.phases.obstacle_min_size = 60.0;
        tuning.phases.obstacle_max_size = 30.0;
        let mut rng = SimRng::seed_from_u64(5);
        let world = World::generate_duel(&tuning, &mut rng);
        assert_eq!(world.obstacles.len(), 4);
        assert!(world.obstacles.iter().all(|o| o.size == Vec2::splat(60.0)));
    }

    #[test]
    fn test_duel_shot_hits_opponent_not_owner() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        roster.get_mut(CharacterId::Player).pos = Vec2::new(100.0, 300.0);
        roster.get_mut(CharacterId::Rival).pos = Vec2::new(900.0, 300.0);
        roster.get_mut(CharacterId::Rival).apply_stun(10.0);
        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::duel(tuning.arena.duel_size, Vec::new());
        world.projectiles.push(shot_at(Vec2::new(100.0, 300.0), 1.0));
        world.projectiles.push(shot_at(Vec2::new(895.0, 300.0), 1.0));

        world.update(0.001, &mut roster, &TickInput::default(), &tuning, &mut rng);
        assert_eq!(roster.get(CharacterId::Player).hp, 100.0);
        assert_eq!(roster.get(CharacterId::Rival).hp, 95.0);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_duel_spheres_only_hit_opponent() {
        let tuning = Tuning::default();
        let mut roster = roster(&tuning);
        {
            let player = roster.get_mut(CharacterId::Player);
            player.add_gold(100);
            assert!(player.purchase(ShopKey::AutoAttack(AutoAttackKind::OrbitingSphere), &tuning.economy));
            player.pos = Vec2::new(300.0, 300.0);
        }
        let rival = roster.get_mut(CharacterId::Rival);
        rival.pos = Vec2::new(360.0, 300.0);
        rival.apply_stun(10.0);

        let mut rng = SimRng::seed_from_u64(3);
        let mut world = World::duel(tuning.arena.duel_size, Vec::new());
        world.update(0.001, &mut roster, &TickInput::default(), &tuning, &mut rng);
        assert_eq!(roster.get(CharacterId::Rival).hp, 95.0);
        assert_eq!(roster.get(CharacterId::Player).hp, 100.0);
    }
}
