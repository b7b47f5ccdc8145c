//! The whole village simulation in one resource.
//!
//! [`VillageWorld::tick`] runs one frame: hint and door timers, the scene
//! fade, discrete actions from this frame's input, movement and door
//! checks, villagers, the clock, crop growth and the dialogue range check.

use bevy::prelude::*;

use super::actors::{nearest_npc, Actor, Npc, NpcId, Role, NPC_BLOCK_RADIUS, TALK_RADIUS};
use super::clock::{GameClock, Hemisphere};
use super::dialogue::{Dialogue, DialogueClick, DialogueStack, Menu, MenuAction, MenuOption};
use super::farming::{CropKind, FarmField, PlantOutcome, TendOutcome};
use super::furniture::{FurnitureKind, HomeFurniture};
use super::grid::{Cell, HomeMap, SolidGrid, TileMap, VillageMap, HOME_DOOR, HOME_SPAWN, STALL};
use super::inventory::{CatalogItem, Stock};
use super::quests::{QuestHelp, QuestLog, PICNIC};
use super::scene::{safe_spawn, Scene, SceneTransition, DOOR_COOLDOWN};
use crate::shared::VillageInput;

/// Longest frame the simulation will step in one go.
pub const MAX_STEP_SECONDS: f32 = 0.05;
pub const HINT_SECONDS: f32 = 6.0;

pub const STARTING_COINS: u32 = 30;
pub const MAX_ENERGY: u32 = 100;
pub const WATER_ENERGY: u32 = 4;
pub const HARVEST_ENERGY: u32 = 2;
pub const PLANT_ENERGY: u32 = 3;
pub const MEAL_COST: u32 = 6;
pub const MEAL_ENERGY: u32 = 25;

/// Status line under the HUD. Expires on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hint {
    pub text: String,
    pub timer: f32,
}

impl Hint {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timer = HINT_SECONDS;
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(0.0);
    }

    pub fn is_visible(&self) -> bool {
        self.timer > 0.0 && !self.text.is_empty()
    }

    pub fn dismiss(&mut self) {
        self.text.clear();
        self.timer = 0.0;
    }
}

/// Things the ECS side needs to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VillageEvent {
    SceneChanged(Scene),
    NewDay(u32),
    QuestCompleted,
    PetAdopted,
    /// Escape with no dialogue showing.
    ExitRequested,
}

#[derive(Resource, Debug, Clone)]
pub struct VillageWorld {
    pub village: VillageMap,
    pub home: HomeMap,
    pub scene: Scene,
    /// Solid grid of the active scene, rebuilt whenever it may change.
    pub solids: SolidGrid,
    pub player: Actor,
    pub npcs: Vec<Npc>,
    pub field: FarmField,
    pub clock: GameClock,
    pub hemisphere: Hemisphere,
    pub energy: u32,
    pub coins: u32,
    pub seeds: Stock<CropKind>,
    pub crops: Stock<CropKind>,
    pub selected_crop: CropKind,
    pub furniture: HomeFurniture,
    pub furniture_stock: Stock<FurnitureKind>,
    pub selected_furniture: FurnitureKind,
    /// 0 or 1; odd swaps width and height.
    pub rotation: u8,
    pub quests: QuestLog,
    pub pet_adopted: bool,
    pub in_own_home: bool,
    /// Village door the player last went through.
    pub return_door: Cell,
    pub transition: SceneTransition,
    pub door_cooldown: f32,
    pub dialogue: DialogueStack,
    pub hint: Hint,
}

impl Default for VillageWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl VillageWorld {
    pub fn new() -> Self {
        let village = VillageMap::build();
        let return_door = village.doors.first().map_or(HOME_DOOR, |door| door.cell);
        let mut world = Self {
            village,
            home: HomeMap::build(),
            scene: Scene::Village,
            solids: SolidGrid::default(),
            player: Actor::player(),
            npcs: Npc::villagers(),
            field: FarmField::default(),
            clock: GameClock::default(),
            hemisphere: Hemisphere::default(),
            energy: MAX_ENERGY,
            coins: STARTING_COINS,
            seeds: Stock::with(&[(CropKind::Sprout, 3)]),
            crops: Stock::default(),
            selected_crop: CropKind::Sprout,
            furniture: HomeFurniture::default(),
            furniture_stock: Stock::with(&[(FurnitureKind::Stool, 1)]),
            selected_furniture: FurnitureKind::Stool,
            rotation: 0,
            quests: QuestLog::default(),
            pet_adopted: false,
            in_own_home: false,
            return_door,
            transition: SceneTransition::default(),
            door_cooldown: 0.0,
            dialogue: DialogueStack::default(),
            hint: Hint::default(),
        };
        world.rebuild_solids();
        world
    }

    /// Terrain of the active scene.
    pub fn tiles(&self) -> &TileMap {
        match self.scene {
            Scene::Village => &self.village.tiles,
            Scene::Home => &self.home.tiles,
        }
    }

    /// Rebuild the active scene's solid grid from scratch.
    pub fn rebuild_solids(&mut self) {
        self.solids = match self.scene {
            Scene::Village => self.village.solids(),
            Scene::Home if self.in_own_home => self.home.solids(self.furniture.blocked_cells()),
            Scene::Home => self.home.solids(std::iter::empty()),
        };
    }

    pub fn nearby_npc(&self) -> Option<&Npc> {
        if self.scene != Scene::Village {
            return None;
        }
        nearest_npc(&self.npcs, self.player.pos, TALK_RADIUS)
    }

    fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    pub fn objective(&self) -> String {
        self.quests.objective(&self.crops)
    }

    // ─── Frame ────────────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32, input: &VillageInput) -> Vec<VillageEvent> {
        let dt = dt.clamp(0.0, MAX_STEP_SECONDS);
        let mut events = Vec::new();

        self.hint.tick(dt);
        self.door_cooldown = (self.door_cooldown - dt).max(0.0);
        if let Some((scene, spawn)) = self.transition.tick(dt) {
            self.change_scene(scene, spawn);
            events.push(VillageEvent::SceneChanged(scene));
        }

        self.apply_actions(input, &mut events);
        self.update_player(dt, input.move_dir);
        self.update_npcs();

        for _ in 0..self.clock.tick(dt) {
            self.energy = MAX_ENERGY;
            events.push(VillageEvent::NewDay(self.clock.day));
        }

        self.field.tick(dt);
        self.check_dialogue_range();
        events
    }

    fn change_scene(&mut self, scene: Scene, spawn: Vec2) {
        self.scene = scene;
        self.rebuild_solids();
        self.player.pos = safe_spawn(spawn, &self.solids);
    }

    fn update_player(&mut self, dt: f32, dir: Vec2) {
        if dir != Vec2::ZERO && !self.dialogue.is_open() {
            let npcs = &self.npcs;
            let in_village = self.scene == Scene::Village;
            self.player.try_move(dir, dt, &self.solids, |next| {
                in_village && npcs.iter().any(|npc| npc.pos.distance(next) < NPC_BLOCK_RADIUS)
            });
        }
        self.check_doors();
    }

    fn check_doors(&mut self) {
        if self.transition.is_running() || self.door_cooldown > 0.0 {
            return;
        }
        let cell = self.player.cell();
        match self.scene {
            Scene::Village => {
                let Some(door) = self.village.door_at(cell) else {
                    return;
                };
                self.return_door = door.cell;
                self.in_own_home = door.is_player_home;
                self.transition.start(Scene::Home, cell_center(HOME_SPAWN));
                self.hint.show(if door.is_player_home {
                    "Welcome home!"
                } else {
                    "You are visiting."
                });
                self.door_cooldown = DOOR_COOLDOWN;
            }
            Scene::Home => {
                if cell != HOME_DOOR {
                    return;
                }
                let outside = self.return_door.offset(1, 0);
                self.transition.start(Scene::Village, cell_center(outside));
                self.in_own_home = false;
                self.hint.show("Back outside!");
                self.door_cooldown = DOOR_COOLDOWN;
            }
        }
    }

    fn update_npcs(&mut self) {
        if self.scene != Scene::Village {
            return;
        }
        for npc in &mut self.npcs {
            npc.pos = npc.home;
        }
    }

    /// Menus close when the player leaves the village or walks away.
    fn check_dialogue_range(&mut self) {
        let Some(talking_to) = self.dialogue.current().npc() else {
            return;
        };
        let nearby = self.nearby_npc().map(|npc| npc.id);
        if nearby != Some(talking_to) {
            self.dialogue.close();
        }
    }

    // ─── Discrete actions ─────────────────────────────────────────────────

    fn apply_actions(&mut self, input: &VillageInput, events: &mut Vec<VillageEvent>) {
        if let Some(point) = input.click {
            match self.dialogue.hit_test(point) {
                DialogueClick::Option(index) => {
                    self.dialogue.select(index);
                    self.confirm_selection(events);
                    return;
                }
                DialogueClick::Box if self.dialogue.is_open() => {
                    self.dialogue.close();
                    return;
                }
                DialogueClick::Box if self.hint.is_visible() => {
                    self.hint.dismiss();
                    return;
                }
                _ => {}
            }
        }

        if self.dialogue.is_open() {
            if input.menu_prev {
                self.dialogue.select_prev();
            }
            if input.menu_next {
                self.dialogue.select_next();
            }
            if input.confirm {
                if self.dialogue.highlighted().is_some() {
                    self.confirm_selection(events);
                } else {
                    self.dialogue.close();
                    self.hint.dismiss();
                }
            } else if input.back {
                self.dialogue.back();
            }
            return;
        }

        if input.exit {
            events.push(VillageEvent::ExitRequested);
            return;
        }
        if input.confirm && self.hint.is_visible() {
            self.hint.dismiss();
            return;
        }

        if input.interact {
            self.interact(events);
        }
        if input.plant {
            self.plant();
        }
        if input.place {
            self.place_furniture();
        }
        if input.pickup {
            self.pickup_furniture();
        }
        if input.rotate {
            self.rotation = (self.rotation + 1) % 2;
            self.hint.show("Rotation toggled.");
        }
        if input.toggle_hemisphere {
            self.hemisphere = self.hemisphere.toggled();
            self.hint.show(format!("Hemisphere: {}", self.hemisphere.label()));
        }
        if let Some(crop) = input.select_crop.and_then(|i| CropKind::ALL.get(i).copied()) {
            self.selected_crop = crop;
            self.hint.show(format!("Selected {} seeds.", crop.name()));
        }
        if input.furniture_next || input.furniture_prev {
            let step = if input.furniture_next { 1 } else { -1 };
            self.selected_furniture = self.selected_furniture.cycled(step);
            self.hint.show(format!("Selected {}.", self.selected_furniture.name()));
        }
    }

    /// E: stall purchase, villager talk, then water or harvest underfoot.
    pub fn interact(&mut self, events: &mut Vec<VillageEvent>) {
        if self.transition.is_running() {
            return;
        }
        if self.scene == Scene::Village && self.player.facing_cell() == STALL {
            self.buy_furniture(self.selected_furniture);
            return;
        }
        if let Some(id) = self.nearby_npc().map(|npc| npc.id) {
            self.talk(id, events);
            return;
        }

        let outcome = match self.scene {
            Scene::Village => self.field.tend(self.player.cell()),
            Scene::Home => None,
        };
        match outcome {
            Some(TendOutcome::NeedsPlanting) => self.hint.show("Plant with Q."),
            Some(TendOutcome::Watered) => {
                self.energy = self.energy.saturating_sub(WATER_ENERGY);
                self.hint.show("Watered!");
            }
            Some(TendOutcome::Harvested(crop)) => {
                self.crops.add(crop, 1);
                self.energy = self.energy.saturating_sub(HARVEST_ENERGY);
                self.hint.show(format!("Harvested {}!", crop.name()));
            }
            Some(TendOutcome::Growing) | None => self.hint.show("Nothing to do here."),
        }
    }

    /// Q: plant the selected crop on the plot underfoot.
    pub fn plant(&mut self) {
        if self.scene != Scene::Village {
            self.hint.show("Stand on tilled soil to plant.");
            return;
        }
        let seeds = &mut self.seeds;
        let outcome = self
            .field
            .plant(self.player.cell(), self.selected_crop, |crop| seeds.take_one(crop));
        match outcome {
            PlantOutcome::Planted(crop) => {
                self.energy = self.energy.saturating_sub(PLANT_ENERGY);
                self.hint.show(format!("Planted {} seeds.", crop.name()));
            }
            PlantOutcome::NotSoil => self.hint.show("Stand on tilled soil to plant."),
            PlantOutcome::AlreadyPlanted => self.hint.show("Already planted."),
            PlantOutcome::NoSeeds => self.hint.show("No seeds. Buy from the Farmer."),
        }
    }

    /// F: place the selected furniture on the facing tile.
    pub fn place_furniture(&mut self) {
        if self.scene != Scene::Home {
            self.hint.show("Place furniture inside your home.");
            return;
        }
        if !self.in_own_home {
            self.hint.show("You can't rearrange someone else's home.");
            return;
        }
        let kind = self.selected_furniture;
        if self.furniture_stock.count(kind) == 0 {
            self.hint.show("No more of that item. Buy at the stall.");
            return;
        }
        let target = self.player.facing_cell();
        if !self.furniture.place(&self.home, kind, target, self.rotation) {
            self.hint.show("Can't place here.");
            return;
        }
        self.furniture_stock.take_one(kind);
        self.rebuild_solids();
        self.hint.show(format!("Placed {}.", kind.name()));
    }

    /// X: pick up whatever covers the facing tile.
    pub fn pickup_furniture(&mut self) {
        if self.scene != Scene::Home {
            return;
        }
        if !self.in_own_home {
            self.hint.show("You can't rearrange someone else's home.");
            return;
        }
        match self.furniture.remove_at(self.player.facing_cell()) {
            Some(item) => {
                self.furniture_stock.add(item.kind, 1);
                self.rebuild_solids();
                self.hint.show(format!("Picked up {}.", item.kind.name()));
            }
            None => self.hint.show("No furniture to pick up."),
        }
    }

    // ─── Villagers ────────────────────────────────────────────────────────

    pub fn talk(&mut self, id: NpcId, events: &mut Vec<VillageEvent>) {
        let Some(role) = self.npc(id).map(|npc| npc.role) else {
            return;
        };
        let name = id.name();
        if self.quests.meet(id) {
            self.hint.show(format!("{}: Nice to meet you!", name));
        }

        match role {
            Role::Farmer => self.dialogue.open(Dialogue::RowMenu(Menu::new(
                id,
                format!("{}: How can I help?", name),
                vec![
                    MenuOption::new("Quest Help", MenuAction::QuestHelp),
                    MenuOption::new("Seed Shop", MenuAction::SeedShop),
                    MenuOption::new("Sell Crops", MenuAction::SellCrops),
                    MenuOption::new("Exit", MenuAction::Exit),
                ],
            ))),
            Role::Furniture => self.dialogue.open(Dialogue::ListMenu(Menu::new(
                id,
                format!("{}: Hi, how is it going?", name),
                vec![
                    MenuOption::new("Furniture Shop", MenuAction::FurnitureShop),
                    MenuOption::new("Exit", MenuAction::Exit),
                ],
            ))),
            Role::Cook => self.dialogue.open(Dialogue::ListMenu(Menu::new(
                id,
                format!("{}: Want a warm meal?", name),
                vec![
                    MenuOption::new(format!("Warm Meal ({}c)", MEAL_COST), MenuAction::BuyMeal),
                    MenuOption::new("Exit", MenuAction::Exit),
                ],
            ))),
            Role::Pet => {
                let text = if self.pet_adopted {
                    format!("{}: Pet is happy to see you.", name)
                } else {
                    self.pet_adopted = true;
                    events.push(VillageEvent::PetAdopted);
                    format!("{}: The pet is yours now.", name)
                };
                self.hint.show(text.clone());
                self.dialogue.open(Dialogue::Message { npc: id, text });
            }
        }
    }

    fn confirm_selection(&mut self, events: &mut Vec<VillageEvent>) {
        let Some(action) = self.dialogue.highlighted() else {
            return;
        };
        let giver = PICNIC.giver.name();
        match action {
            MenuAction::QuestHelp => match self.quests.quest_help(&mut self.crops) {
                QuestHelp::MeetEveryoneFirst => {
                    self.hint.show(format!("{}: Meet the others first, then I'll have a task.", giver))
                }
                QuestHelp::Accepted => {
                    let text = format!("{}: {}", giver, PICNIC.intro);
                    self.hint.show(text.clone());
                    self.dialogue.open(Dialogue::QuestPrompt {
                        npc: PICNIC.giver,
                        text,
                    });
                }
                QuestHelp::Completed => {
                    events.push(VillageEvent::QuestCompleted);
                    self.hint.show(format!("{}: Thank you! The picnic sparkles now!", giver));
                }
                QuestHelp::StillNeed(n) => self.hint.show(format!("{}: We still need {} crops.", giver, n)),
                QuestHelp::AlreadyDone => self.hint.show(format!("{}: The picnic is ready!", giver)),
            },
            MenuAction::SeedShop => {
                let mut options: Vec<MenuOption> = CropKind::ALL
                    .iter()
                    .map(|&crop| {
                        MenuOption::new(
                            format!("{} ({}c)", crop.name(), crop.def().seed_cost),
                            MenuAction::BuySeed(crop),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("Exit", MenuAction::Exit));
                self.dialogue.open(Dialogue::RowMenu(Menu::new(
                    NpcId::Hana,
                    "Hana: Pick a seed.",
                    options,
                )));
            }
            MenuAction::FurnitureShop => {
                let mut options: Vec<MenuOption> = FurnitureKind::ALL
                    .iter()
                    .map(|&kind| {
                        MenuOption::new(
                            format!("{} ({}c)", kind.name(), kind.def().cost),
                            MenuAction::BuyFurniture(kind),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("Exit", MenuAction::Exit));
                self.dialogue.open(Dialogue::RowMenu(Menu::new(
                    NpcId::Sora,
                    "Sora: Pick a furniture item.",
                    options,
                )));
            }
            MenuAction::SellCrops => self.sell_crops(),
            MenuAction::BuySeed(crop) => self.buy_seed(crop),
            MenuAction::BuyFurniture(kind) => self.buy_furniture(kind),
            MenuAction::BuyMeal => self.buy_meal(),
            MenuAction::Exit => self.dialogue.close(),
        }
    }

    // ─── Economy ──────────────────────────────────────────────────────────

    pub fn buy_seed(&mut self, crop: CropKind) {
        let cost = crop.def().seed_cost;
        if self.coins < cost {
            self.hint.show(format!("{} seeds cost {} coins.", crop.name(), cost));
            return;
        }
        self.coins -= cost;
        self.seeds.add(crop, 1);
        self.hint.show(format!("Bought {} seeds.", crop.name()));
    }

    pub fn buy_furniture(&mut self, kind: FurnitureKind) {
        let cost = kind.def().cost;
        if self.coins < cost {
            self.hint.show(format!("{} costs {} coins.", kind.name(), cost));
            return;
        }
        self.coins -= cost;
        self.furniture_stock.add(kind, 1);
        self.hint.show(format!("Bought {}.", kind.name()));
    }

    pub fn buy_meal(&mut self) {
        if self.coins < MEAL_COST {
            self.hint.show(format!("Meal costs {} coins.", MEAL_COST));
            return;
        }
        self.coins -= MEAL_COST;
        self.energy = self.energy.saturating_add(MEAL_ENERGY).min(MAX_ENERGY);
        self.hint.show("Warm meal restored energy.");
    }

    pub fn sell_crops(&mut self) {
        let total: u32 = self
            .crops
            .drain()
            .into_iter()
            .fold(0u32, |sum, (crop, count)| {
                sum.saturating_add(count.saturating_mul(crop.def().sell_price))
            });
        if total == 0 {
            self.hint.show("No crops to sell.");
            return;
        }
        self.coins = self.coins.saturating_add(total);
        self.hint.show(format!("Sold crops for {} coins.", total));
    }
}

/// Position of a tile's centre in tile units.
pub fn cell_center(cell: Cell) -> Vec2 {
    Vec2::new(cell.col as f32, cell.row as f32)
}
