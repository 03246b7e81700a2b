use crate::{Material, Program};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleViewModel {
    pub material: Material,
    pub batch: String,
    pub stages: Vec<StageRowView>,
    pub armed_stages: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRowView {
    pub index: usize,
    pub program: Program,
    pub speed_hz: u32,
    pub cycles: u32,
    pub enabled: bool,
}

impl StageRowView {
    /// Label of the stage's run toggle.
    pub fn run_label(&self) -> &'static str {
        if self.enabled {
            "Running"
        } else {
            "Run"
        }
    }
}
