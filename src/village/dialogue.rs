//! Villager dialogue as an explicit stack of states.
//!
//! Opening a menu while another is showing pushes the old one; "back" pops
//! it again and closing clears the whole stack. Option rectangles are laid
//! out here so that mouse hit-testing and drawing agree.

use bevy::math::Vec2;

use super::actors::NpcId;
use super::farming::CropKind;
use super::furniture::FurnitureKind;
use crate::shared::ScreenRect;

/// Bottom panel holding the dialogue text and options.
pub const DIALOGUE_BOX: ScreenRect = ScreenRect::new(40.0, 380.0, 880.0, 140.0);

const OPTION_INSET: f32 = 24.0;
const LIST_TOP: f32 = 48.0;
const LIST_STEP: f32 = 28.0;
const LIST_SIZE: Vec2 = Vec2::new(260.0, 24.0);
const ROW_TOP: f32 = 84.0;
const ROW_STEP: f32 = 170.0;
const ROW_SIZE: Vec2 = Vec2::new(160.0, 36.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    QuestHelp,
    SeedShop,
    SellCrops,
    BuySeed(CropKind),
    FurnitureShop,
    BuyFurniture(FurnitureKind),
    BuyMeal,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub action: MenuAction,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub npc: NpcId,
    pub text: String,
    pub options: Vec<MenuOption>,
    pub index: usize,
}

impl Menu {
    pub fn new(npc: NpcId, text: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self {
            npc,
            text: text.into(),
            options,
            index: 0,
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            return;
        }
        self.index = (self.index as isize + delta).rem_euclid(len) as usize;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialogue {
    #[default]
    Closed,
    /// Options stacked vertically.
    ListMenu(Menu),
    /// Options side by side.
    RowMenu(Menu),
    /// A quest was just handed out.
    QuestPrompt { npc: NpcId, text: String },
    Message { npc: NpcId, text: String },
}

impl Dialogue {
    pub fn npc(&self) -> Option<NpcId> {
        match self {
            Dialogue::Closed => None,
            Dialogue::ListMenu(menu) | Dialogue::RowMenu(menu) => Some(menu.npc),
            Dialogue::QuestPrompt { npc, .. } | Dialogue::Message { npc, .. } => Some(*npc),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Dialogue::Closed => "",
            Dialogue::ListMenu(menu) | Dialogue::RowMenu(menu) => &menu.text,
            Dialogue::QuestPrompt { text, .. } | Dialogue::Message { text, .. } => text,
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        match self {
            Dialogue::ListMenu(menu) | Dialogue::RowMenu(menu) => Some(menu),
            _ => None,
        }
    }

    fn menu_mut(&mut self) -> Option<&mut Menu> {
        match self {
            Dialogue::ListMenu(menu) | Dialogue::RowMenu(menu) => Some(menu),
            _ => None,
        }
    }

    /// Screen rectangles of each option, in option order.
    pub fn option_rects(&self) -> Vec<ScreenRect> {
        let (count, row) = match self {
            Dialogue::ListMenu(menu) => (menu.options.len(), false),
            Dialogue::RowMenu(menu) => (menu.options.len(), true),
            _ => return Vec::new(),
        };
        (0..count)
            .map(|i| {
                let i = i as f32;
                if row {
                    ScreenRect::new(
                        DIALOGUE_BOX.x + OPTION_INSET + i * ROW_STEP,
                        DIALOGUE_BOX.y + ROW_TOP,
                        ROW_SIZE.x,
                        ROW_SIZE.y,
                    )
                } else {
                    ScreenRect::new(
                        DIALOGUE_BOX.x + OPTION_INSET,
                        DIALOGUE_BOX.y + LIST_TOP + i * LIST_STEP,
                        LIST_SIZE.x,
                        LIST_SIZE.y,
                    )
                }
            })
            .collect()
    }
}

/// What a pointer click inside the dialogue area hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueClick {
    Option(usize),
    Box,
    Outside,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueStack {
    current: Dialogue,
    history: Vec<Dialogue>,
}

impl DialogueStack {
    pub fn current(&self) -> &Dialogue {
        &self.current
    }

    pub fn is_open(&self) -> bool {
        self.current != Dialogue::Closed
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn open(&mut self, next: Dialogue) {
        let previous = std::mem::replace(&mut self.current, next);
        if previous != Dialogue::Closed {
            self.history.push(previous);
        }
    }

    /// Pop to the previous state, or close when there is none.
    pub fn back(&mut self) {
        self.current = self.history.pop().unwrap_or_default();
    }

    pub fn close(&mut self) {
        self.current = Dialogue::Closed;
        self.history.clear();
    }

    pub fn select_next(&mut self) {
        if let Some(menu) = self.current.menu_mut() {
            menu.step(1);
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(menu) = self.current.menu_mut() {
            menu.step(-1);
        }
    }

    pub fn select(&mut self, index: usize) {
        if let Some(menu) = self.current.menu_mut() {
            if index < menu.options.len() {
                menu.index = index;
            }
        }
    }

    /// Action of the highlighted option; `None` when no options are showing.
    pub fn highlighted(&self) -> Option<MenuAction> {
        let menu = self.current.menu()?;
        menu.options.get(menu.index).map(|option| option.action)
    }

    pub fn hit_test(&self, point: Vec2) -> DialogueClick {
        if let Some(index) = self
            .current
            .option_rects()
            .iter()
            .position(|rect| rect.contains(point))
        {
            return DialogueClick::Option(index);
        }
        if DIALOGUE_BOX.contains(point) {
            DialogueClick::Box
        } else {
            DialogueClick::Outside
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer_menu() -> Dialogue {
        Dialogue::RowMenu(Menu::new(
            NpcId::Hana,
            "Hana: How can I help?",
            vec![
                MenuOption::new("Quest Help", MenuAction::QuestHelp),
                MenuOption::new("Seed Shop", MenuAction::SeedShop),
                MenuOption::new("Exit", MenuAction::Exit),
            ],
        ))
    }

    fn seed_menu() -> Dialogue {
        Dialogue::RowMenu(Menu::new(
            NpcId::Hana,
            "Hana: Pick a seed.",
            vec![
                MenuOption::new("Sprout (3c)", MenuAction::BuySeed(CropKind::Sprout)),
                MenuOption::new("Exit", MenuAction::Exit),
            ],
        ))
    }

    #[test]
    fn test_open_pushes_and_back_pops() {
        let mut stack = DialogueStack::default();
        stack.open(farmer_menu());
        assert_eq!(stack.depth(), 0);
        stack.select_next();
        stack.open(seed_menu());
        assert_eq!(stack.depth(), 1);
        stack.back();
        assert_eq!(stack.current().text(), "Hana: How can I help?");
        assert_eq!(stack.highlighted(), Some(MenuAction::SeedShop));
        stack.back();
        assert!(!stack.is_open());
    }

    #[test]
    fn test_close_clears_history() {
        let mut stack = DialogueStack::default();
        stack.open(farmer_menu());
        stack.open(seed_menu());
        stack.close();
        assert!(!stack.is_open());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut stack = DialogueStack::default();
        stack.open(farmer_menu());
        stack.select_prev();
        assert_eq!(stack.highlighted(), Some(MenuAction::Exit));
        stack.select_next();
        assert_eq!(stack.highlighted(), Some(MenuAction::QuestHelp));
    }

    #[test]
    fn test_messages_have_no_options() {
        let mut stack = DialogueStack::default();
        stack.open(Dialogue::Message {
            npc: NpcId::Poko,
            text: "Poko: The pet is yours now.".into(),
        });
        stack.select_next();
        assert_eq!(stack.highlighted(), None);
        assert!(stack.current().option_rects().is_empty());
    }

    #[test]
    fn test_hit_test_rows_and_box() {
        let mut stack = DialogueStack::default();
        stack.open(farmer_menu());
        let rects = stack.current().option_rects();
        assert_eq!(rects.len(), 3);
        assert!(rects[0].x < rects[1].x);
        assert_eq!(rects[0].y, rects[1].y);
        let centre = Vec2::new(rects[2].x + 5.0, rects[2].y + 5.0);
        assert_eq!(stack.hit_test(centre), DialogueClick::Option(2));
        assert_eq!(
            stack.hit_test(Vec2::new(DIALOGUE_BOX.x + 2.0, DIALOGUE_BOX.y + 2.0)),
            DialogueClick::Box
        );
        assert_eq!(stack.hit_test(Vec2::ZERO), DialogueClick::Outside);
    }

    #[test]
    fn test_list_options_stack_vertically_inside_box() {
        let dialogue = Dialogue::ListMenu(Menu::new(
            NpcId::Sora,
            "Sora: Hi, how is it going?",
            vec![
                MenuOption::new("Furniture Shop", MenuAction::FurnitureShop),
                MenuOption::new("Exit", MenuAction::Exit),
            ],
        ));
        let rects = dialogue.option_rects();
        assert!(rects[1].y > rects[0].y);
        for rect in rects {
            assert!(rect.y + rect.h <= DIALOGUE_BOX.y + DIALOGUE_BOX.h);
        }
    }
}
