//! Best-effort persistence of the village as one JSON snapshot.
//!
//! There is no schema version: every field is optional on read, so older or
//! partial snapshots load whatever they carry and keep defaults for the
//! rest. Native builds write a file next to the executable; browser builds
//! use `localStorage`.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::shared::*;
use crate::village::actors::NpcId;
use crate::village::clock::{GameClock, Hemisphere};
use crate::village::farming::CropKind;
use crate::village::furniture::{FurnitureKind, PlacedFurniture};
use crate::village::inventory::CatalogItem;
use crate::village::world::{VillageWorld, MAX_ENERGY};

/// Storage key, also used as the native file stem.
pub const SAVE_KEY: &str = "kawaiiVillageSave";
pub const AUTOSAVE_SECONDS: f32 = 10.0;

// ═══════════════════════════════════════════════════════════════════════
// SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VillageSnapshot {
    pub day: Option<u32>,
    pub time_minutes: Option<u32>,
    pub energy: Option<u32>,
    pub coins: Option<u32>,
    pub hemisphere: Option<Hemisphere>,
    pub selected_crop_id: Option<String>,
    pub seed_inventory: Option<BTreeMap<String, u32>>,
    pub crop_inventory: Option<BTreeMap<String, u32>>,
    pub furniture_inventory: Option<BTreeMap<String, u32>>,
    pub home_furniture: Option<Vec<SavedFurniture>>,
    pub quests: Option<SavedQuests>,
    pub pet_adopted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFurniture {
    pub id: String,
    pub r: i32,
    pub c: i32,
    #[serde(default)]
    pub rotation: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedQuests {
    pub picnic: Option<SavedQuestFlags>,
    pub introductions: Option<SavedIntroductions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedQuestFlags {
    pub accepted: Option<bool>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedIntroductions {
    pub met: BTreeMap<String, bool>,
}

impl VillageSnapshot {
    pub fn capture(world: &VillageWorld) -> Self {
        Self {
            day: Some(world.clock.day),
            time_minutes: Some(world.clock.minutes),
            energy: Some(world.energy),
            coins: Some(world.coins),
            hemisphere: Some(world.hemisphere),
            selected_crop_id: Some(world.selected_crop.id().to_string()),
            seed_inventory: Some(world.seeds.to_map()),
            crop_inventory: Some(world.crops.to_map()),
            furniture_inventory: Some(world.furniture_stock.to_map()),
            home_furniture: Some(
                world
                    .furniture
                    .items
                    .iter()
                    .map(|item| SavedFurniture {
                        id: item.kind.id().to_string(),
                        r: item.row,
                        c: item.col,
                        rotation: item.rotation,
                    })
                    .collect(),
            ),
            quests: Some(SavedQuests {
                picnic: Some(SavedQuestFlags {
                    accepted: Some(world.quests.picnic.accepted),
                    completed: Some(world.quests.picnic.completed),
                }),
                introductions: Some(SavedIntroductions {
                    met: world
                        .quests
                        .met_names()
                        .map(|(id, met)| (id.name().to_string(), met))
                        .collect(),
                }),
            }),
            pet_adopted: Some(world.pet_adopted),
        }
    }

    /// Overlay every present field onto `world`. Unknown ids are skipped and
    /// furniture is clamped back inside the home interior.
    pub fn apply(&self, world: &mut VillageWorld) {
        world.clock = GameClock::new(
            self.day.unwrap_or(world.clock.day),
            self.time_minutes.unwrap_or(world.clock.minutes),
        );
        if let Some(energy) = self.energy {
            world.energy = energy.min(MAX_ENERGY);
        }
        if let Some(coins) = self.coins {
            world.coins = coins;
        }
        if let Some(hemisphere) = self.hemisphere {
            world.hemisphere = hemisphere;
        }
        if let Some(crop) = self.selected_crop_id.as_deref().and_then(CropKind::from_id) {
            world.selected_crop = crop;
        }
        if let Some(map) = &self.seed_inventory {
            world.seeds.merge_map(map);
        }
        if let Some(map) = &self.crop_inventory {
            world.crops.merge_map(map);
        }
        if let Some(map) = &self.furniture_inventory {
            world.furniture_stock.merge_map(map);
        }
        if let Some(items) = &self.home_furniture {
            world.furniture.items = items
                .iter()
                .filter_map(|saved| {
                    let kind = FurnitureKind::from_id(&saved.id)?;
                    let item = PlacedFurniture {
                        kind,
                        row: saved.r,
                        col: saved.c,
                        rotation: saved.rotation % 2,
                    };
                    Some(item.clamped_into_interior())
                })
                .collect();
        }
        if let Some(quests) = &self.quests {
            if let Some(picnic) = &quests.picnic {
                if let Some(accepted) = picnic.accepted {
                    world.quests.picnic.accepted = accepted;
                }
                if let Some(completed) = picnic.completed {
                    world.quests.picnic.completed = completed;
                }
            }
            if let Some(intro) = &quests.introductions {
                for (name, &met) in &intro.met {
                    if let Some(id) = NpcId::from_name(name) {
                        world.quests.set_met(id, met);
                    }
                }
            }
        }
        if let Some(adopted) = self.pet_adopted {
            world.pet_adopted = adopted;
        }
        world.rebuild_solids();
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Serialization failed: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

/// Real time since the last autosave.
#[derive(Resource, Debug)]
pub struct AutosaveTimer(pub Timer);

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(AUTOSAVE_SECONDS, TimerMode::Repeating))
    }
}

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutosaveTimer>()
            .add_systems(
                OnEnter(GameState::Village),
                load_village_snapshot.after(crate::village::start_village),
            )
            .add_systems(
                OnExit(GameState::Village),
                save_on_exit.before(crate::village::end_village),
            )
            .add_systems(
                Update,
                (tick_autosave, save_on_new_day, handle_save_request)
                    .chain()
                    .run_if(in_state(GameState::Village)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORAGE
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

#[cfg(not(target_arch = "wasm32"))]
fn save_path() -> PathBuf {
    saves_directory().join(format!("{}.json", SAVE_KEY))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_snapshot(json: &str) -> Result<(), String> {
    let dir = saves_directory();
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Could not create saves directory: {}", e))?;
    let path = save_path();
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

/// `Ok(None)` when nothing has been saved yet.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_snapshot() -> Result<Option<String>, String> {
    let path = save_path();
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "No window".to_string())?
        .local_storage()
        .map_err(|e| format!("localStorage unavailable: {:?}", e))?
        .ok_or_else(|| "localStorage disabled".to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn write_snapshot(json: &str) -> Result<(), String> {
    local_storage()?
        .set_item(SAVE_KEY, json)
        .map_err(|e| format!("localStorage write failed: {:?}", e))
}

#[cfg(target_arch = "wasm32")]
pub fn read_snapshot() -> Result<Option<String>, String> {
    local_storage()?
        .get_item(SAVE_KEY)
        .map_err(|e| format!("localStorage read failed: {:?}", e))
}

fn save_world(world: &VillageWorld) -> Result<(), String> {
    let json = VillageSnapshot::capture(world).to_json()?;
    write_snapshot(&json)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn load_village_snapshot(world: Option<ResMut<VillageWorld>>, mut timer: ResMut<AutosaveTimer>) {
    let Some(mut world) = world else {
        return;
    };
    timer.0.reset();
    let json = match read_snapshot() {
        Ok(Some(json)) => json,
        Ok(None) => {
            info!("[Save] No village snapshot yet, starting fresh");
            return;
        }
        Err(e) => {
            warn!("[Save] Could not read snapshot: {}", e);
            return;
        }
    };
    match VillageSnapshot::from_json(&json) {
        Ok(snapshot) => {
            snapshot.apply(&mut world);
            info!("[Save] Loaded village on day {}", world.clock.day);
        }
        Err(e) => warn!("[Save] Ignoring malformed snapshot: {}", e),
    }
}

fn tick_autosave(
    time: Res<Time>,
    mut timer: ResMut<AutosaveTimer>,
    mut requests: EventWriter<SaveRequestEvent>,
) {
    if timer.0.tick(time.delta()).just_finished() {
        requests.send(SaveRequestEvent);
    }
}

fn save_on_new_day(mut days: EventReader<DayStartEvent>, mut requests: EventWriter<SaveRequestEvent>) {
    for ev in days.read() {
        info!("[Save] Autosaving at the start of day {}", ev.day);
        requests.send(SaveRequestEvent);
    }
}

fn handle_save_request(mut requests: EventReader<SaveRequestEvent>, world: Option<Res<VillageWorld>>) {
    // Several requests in one frame collapse into one write.
    if requests.read().count() == 0 {
        return;
    }
    let Some(world) = world else {
        return;
    };
    if let Err(e) = save_world(&world) {
        warn!("[Save] Autosave FAILED: {}", e);
    }
}

fn save_on_exit(world: Option<Res<VillageWorld>>) {
    let Some(world) = world else {
        return;
    };
    match save_world(&world) {
        Ok(()) => info!("[Save] Village saved"),
        Err(e) => warn!("[Save] Save on exit FAILED: {}", e),
    }
}
