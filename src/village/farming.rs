//! Farm plots on the tilled soil south-west of the village square.
//!
//! Plots only grow while watered, and growth stops at the crop's grow time.

use super::grid::{Cell, FARM_COLS, FARM_ROWS};
use super::inventory::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CropKind {
    #[default]
    Sprout,
    Carrot,
    Berry,
}

pub struct CropDef {
    pub name: &'static str,
    pub grow_seconds: f32,
    pub sell_price: u32,
    pub seed_cost: u32,
}

const SPROUT: CropDef = CropDef { name: "Sprout", grow_seconds: 10.0, sell_price: 6, seed_cost: 3 };
const CARROT: CropDef = CropDef { name: "Carrot", grow_seconds: 10.0, sell_price: 10, seed_cost: 5 };
const BERRY: CropDef = CropDef { name: "Berry", grow_seconds: 10.0, sell_price: 16, seed_cost: 8 };

impl CropKind {
    pub fn def(self) -> &'static CropDef {
        match self {
            CropKind::Sprout => &SPROUT,
            CropKind::Carrot => &CARROT,
            CropKind::Berry => &BERRY,
        }
    }
}

impl CatalogItem for CropKind {
    const ALL: &'static [Self] = &[CropKind::Sprout, CropKind::Carrot, CropKind::Berry];

    fn id(self) -> &'static str {
        match self {
            CropKind::Sprout => "sprout",
            CropKind::Carrot => "carrot",
            CropKind::Berry => "berry",
        }
    }

    fn name(self) -> &'static str {
        self.def().name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmPlot {
    pub cell: Cell,
    pub planted: bool,
    pub watered: bool,
    pub grow_time: f32,
    pub crop: CropKind,
}

impl FarmPlot {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            planted: false,
            watered: false,
            grow_time: 0.0,
            crop: CropKind::Sprout,
        }
    }

    pub fn is_grown(&self) -> bool {
        self.planted && self.grow_time >= self.crop.def().grow_seconds
    }

    /// 0.0..=1.0 growth fraction, used for the sprite.
    pub fn growth(&self) -> f32 {
        if !self.planted {
            return 0.0;
        }
        (self.grow_time / self.crop.def().grow_seconds).clamp(0.0, 1.0)
    }

    pub fn tick(&mut self, dt: f32) {
        if self.planted && self.watered {
            let cap = self.crop.def().grow_seconds;
            self.grow_time = (self.grow_time + dt).min(cap);
        }
    }

    fn clear(&mut self) {
        self.planted = false;
        self.watered = false;
        self.grow_time = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantOutcome {
    Planted(CropKind),
    NotSoil,
    AlreadyPlanted,
    NoSeeds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TendOutcome {
    NeedsPlanting,
    Watered,
    Harvested(CropKind),
    /// Planted and watered but still growing.
    Growing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmField {
    pub plots: Vec<FarmPlot>,
}

impl Default for FarmField {
    fn default() -> Self {
        let plots = FARM_ROWS
            .flat_map(|row| FARM_COLS.map(move |col| FarmPlot::new(Cell::new(row, col))))
            .collect();
        Self { plots }
    }
}

impl FarmField {
    pub fn plot(&self, cell: Cell) -> Option<&FarmPlot> {
        self.plots.iter().find(|plot| plot.cell == cell)
    }

    pub fn plot_mut(&mut self, cell: Cell) -> Option<&mut FarmPlot> {
        self.plots.iter_mut().find(|plot| plot.cell == cell)
    }

    pub fn tick(&mut self, dt: f32) {
        for plot in &mut self.plots {
            plot.tick(dt);
        }
    }

    /// Plant `crop` at `cell`. `take_seed` is called only once every other
    /// check has passed and must report whether a seed was available.
    pub fn plant(
        &mut self,
        cell: Cell,
        crop: CropKind,
        take_seed: impl FnOnce(CropKind) -> bool,
    ) -> PlantOutcome {
        let Some(plot) = self.plot_mut(cell) else {
            return PlantOutcome::NotSoil;
        };
        if plot.planted {
            return PlantOutcome::AlreadyPlanted;
        }
        if !take_seed(crop) {
            return PlantOutcome::NoSeeds;
        }
        plot.planted = true;
        plot.watered = false;
        plot.grow_time = 0.0;
        plot.crop = crop;
        PlantOutcome::Planted(crop)
    }

    /// Water or harvest the plot at `cell`. `None` when there is no plot.
    pub fn tend(&mut self, cell: Cell) -> Option<TendOutcome> {
        let plot = self.plot_mut(cell)?;
        let outcome = if !plot.planted {
            TendOutcome::NeedsPlanting
        } else if !plot.watered {
            plot.watered = true;
            TendOutcome::Watered
        } else if plot.is_grown() {
            let crop = plot.crop;
            plot.clear();
            TendOutcome::Harvested(crop)
        } else {
            TendOutcome::Growing
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soil() -> Cell {
        Cell::new(10, 2)
    }

    #[test]
    fn test_field_covers_the_soil_block() {
        let field = FarmField::default();
        assert_eq!(field.plots.len(), 4 * 7);
        assert!(field.plot(Cell::new(13, 8)).is_some());
        assert!(field.plot(Cell::new(9, 2)).is_none());
    }

    #[test]
    fn test_plant_requires_seed() {
        let mut field = FarmField::default();
        let outcome = field.plant(soil(), CropKind::Carrot, |_| false);
        assert_eq!(outcome, PlantOutcome::NoSeeds);
        assert!(!field.plot(soil()).map_or(true, |p| p.planted));
    }

    #[test]
    fn test_plant_off_soil_never_takes_a_seed() {
        let mut field = FarmField::default();
        let mut asked = false;
        let outcome = field.plant(Cell::new(0, 0), CropKind::Sprout, |_| {
            asked = true;
            true
        });
        assert_eq!(outcome, PlantOutcome::NotSoil);
        assert!(!asked);
    }

    #[test]
    fn test_plant_twice_is_rejected() {
        let mut field = FarmField::default();
        field.plant(soil(), CropKind::Sprout, |_| true);
        assert_eq!(
            field.plant(soil(), CropKind::Sprout, |_| true),
            PlantOutcome::AlreadyPlanted
        );
    }

    #[test]
    fn test_growth_only_while_watered_and_capped() {
        let mut field = FarmField::default();
        field.plant(soil(), CropKind::Berry, |_| true);
        field.tick(5.0);
        assert_eq!(field.plot(soil()).map(|p| p.grow_time), Some(0.0));

        assert_eq!(field.tend(soil()), Some(TendOutcome::Watered));
        field.tick(4.0);
        field.tick(40.0);
        assert_eq!(field.plot(soil()).map(|p| p.grow_time), Some(10.0));
    }

    #[test]
    fn test_harvest_before_grown_is_rejected() {
        let mut field = FarmField::default();
        field.plant(soil(), CropKind::Sprout, |_| true);
        field.tend(soil());
        field.tick(3.0);
        assert_eq!(field.tend(soil()), Some(TendOutcome::Growing));
        assert!(field.plot(soil()).map_or(false, |p| p.planted));
    }

    #[test]
    fn test_harvest_resets_plot() {
        let mut field = FarmField::default();
        field.plant(soil(), CropKind::Carrot, |_| true);
        field.tend(soil());
        field.tick(10.0);
        assert_eq!(field.tend(soil()), Some(TendOutcome::Harvested(CropKind::Carrot)));
        let plot = field.plot(soil()).cloned().unwrap_or_else(|| FarmPlot::new(soil()));
        assert!(!plot.planted && !plot.watered);
        assert_eq!(plot.grow_time, 0.0);
        assert_eq!(field.tend(soil()), Some(TendOutcome::NeedsPlanting));
    }
}
