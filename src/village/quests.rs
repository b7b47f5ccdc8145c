//! Introductions and the picnic quest.
//!
//! Meeting all four villagers unlocks Hana's picnic task; turning it in
//! consumes the required crops.

use super::actors::NpcId;
use super::farming::CropKind;
use super::inventory::Stock;

pub struct QuestDef {
    pub title: &'static str,
    pub giver: NpcId,
    pub required: u32,
    pub intro: &'static str,
}

pub const PICNIC: QuestDef = QuestDef {
    title: "Picnic Prep",
    giver: NpcId::Hana,
    required: 1,
    intro: "Could you grow 1 crop for the village picnic?",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestFlags {
    pub accepted: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestHelp {
    /// Someone has not been introduced yet.
    MeetEveryoneFirst,
    Accepted,
    Completed,
    StillNeed(u32),
    AlreadyDone,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestLog {
    pub picnic: QuestFlags,
    met: [bool; NpcId::ALL.len()],
}

impl QuestLog {
    /// Mark `npc` as met. Returns `true` on the first meeting only.
    pub fn meet(&mut self, npc: NpcId) -> bool {
        let slot = &mut self.met[npc.index()];
        let first = !*slot;
        *slot = true;
        first
    }

    pub fn set_met(&mut self, npc: NpcId, met: bool) {
        self.met[npc.index()] = met;
    }

    pub fn has_met(&self, npc: NpcId) -> bool {
        self.met[npc.index()]
    }

    pub fn all_met(&self) -> bool {
        self.met.iter().all(|&met| met)
    }

    pub fn next_introduction(&self) -> Option<NpcId> {
        NpcId::ALL.into_iter().find(|&id| !self.has_met(id))
    }

    pub fn progress(crops: &Stock<CropKind>) -> u32 {
        crops.total()
    }

    /// The picnic quest step behind the Farmer's "Quest Help" option.
    pub fn quest_help(&mut self, crops: &mut Stock<CropKind>) -> QuestHelp {
        if !self.all_met() {
            return QuestHelp::MeetEveryoneFirst;
        }
        if !self.picnic.accepted {
            self.picnic.accepted = true;
            return QuestHelp::Accepted;
        }
        if self.picnic.completed {
            return QuestHelp::AlreadyDone;
        }
        let progress = Self::progress(crops);
        if progress >= PICNIC.required {
            crops.take_any(PICNIC.required);
            self.picnic.completed = true;
            QuestHelp::Completed
        } else {
            QuestHelp::StillNeed(PICNIC.required - progress)
        }
    }

    /// Current objective line for the HUD.
    pub fn objective(&self, crops: &Stock<CropKind>) -> String {
        if self.picnic.completed {
            return "Picnic ready! Hana is happy.".to_string();
        }
        if self.picnic.accepted {
            return if Self::progress(crops) >= PICNIC.required {
                "Bring crops to Hana.".to_string()
            } else {
                format!("{}: Harvest {} crops.", PICNIC.title, PICNIC.required)
            };
        }
        match self.next_introduction() {
            Some(npc) => format!("Introduce yourself to {}.", npc.name()),
            None => "Talk to Hana for your first task.".to_string(),
        }
    }

    /// Speech-bubble marker over a villager's head.
    pub fn bubble(&self, npc: NpcId, crops: &Stock<CropKind>) -> &'static str {
        if npc != PICNIC.giver {
            return "E";
        }
        let ready = Self::progress(crops) >= PICNIC.required;
        match (self.picnic.accepted, self.picnic.completed) {
            (false, _) => "E!",
            (true, false) if ready => "E!",
            (true, false) => "E...",
            (true, true) => "E",
        }
    }

    pub fn met_names(&self) -> impl Iterator<Item = (NpcId, bool)> + '_ {
        NpcId::ALL.into_iter().map(|id| (id, self.has_met(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meet_all(log: &mut QuestLog) {
        for id in NpcId::ALL {
            log.meet(id);
        }
    }

    #[test]
    fn test_meet_reports_first_time_only() {
        let mut log = QuestLog::default();
        assert!(log.meet(NpcId::Kumo));
        assert!(!log.meet(NpcId::Kumo));
        assert_eq!(log.next_introduction(), Some(NpcId::Hana));
    }

    #[test]
    fn test_picnic_gated_on_introductions() {
        let mut log = QuestLog::default();
        let mut crops = Stock::default();
        log.meet(NpcId::Hana);
        assert_eq!(log.quest_help(&mut crops), QuestHelp::MeetEveryoneFirst);
        assert!(!log.picnic.accepted);
    }

    #[test]
    fn test_picnic_flow_consumes_crops() {
        let mut log = QuestLog::default();
        let mut crops = Stock::default();
        meet_all(&mut log);
        assert_eq!(log.quest_help(&mut crops), QuestHelp::Accepted);
        assert_eq!(log.quest_help(&mut crops), QuestHelp::StillNeed(1));
        crops.add(CropKind::Berry, 2);
        assert_eq!(log.quest_help(&mut crops), QuestHelp::Completed);
        assert_eq!(crops.count(CropKind::Berry), 1);
        assert_eq!(log.quest_help(&mut crops), QuestHelp::AlreadyDone);
    }

    #[test]
    fn test_objective_text_follows_progress() {
        let mut log = QuestLog::default();
        let mut crops = Stock::default();
        assert_eq!(log.objective(&crops), "Introduce yourself to Hana.");
        meet_all(&mut log);
        assert_eq!(log.objective(&crops), "Talk to Hana for your first task.");
        log.quest_help(&mut crops);
        assert_eq!(log.objective(&crops), "Picnic Prep: Harvest 1 crops.");
        crops.add(CropKind::Sprout, 1);
        assert_eq!(log.objective(&crops), "Bring crops to Hana.");
    }

    #[test]
    fn test_bubbles() {
        let mut log = QuestLog::default();
        let crops = Stock::default();
        assert_eq!(log.bubble(NpcId::Hana, &crops), "E!");
        assert_eq!(log.bubble(NpcId::Poko, &crops), "E");
        log.picnic.accepted = true;
        assert_eq!(log.bubble(NpcId::Hana, &crops), "E...");
    }
}
