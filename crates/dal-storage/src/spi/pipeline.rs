use crate::model::Sort;
use crate::spi::filter::Filter;

#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    Match(Filter),
    Sort(Vec<Sort>),
    Skip(u64),
    Limit(u64),
}

/// Ordered aggregation stages, executed server-side where the backend can.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, filter: Filter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    pub fn sort(mut self, sorts: Vec<Sort>) -> Self {
        self.stages.push(Stage::Sort(sorts));
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.stages.push(Stage::Skip(n));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The leading match stage; tenant guards run against it.
    pub fn leading_match(&self) -> Option<&Filter> {
        match self.stages.first() {
            Some(Stage::Match(filter)) => Some(filter),
            _ => None,
        }
    }
}
