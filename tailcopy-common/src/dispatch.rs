use log::{debug, trace};

use crate::verdict::Verdict;
use crate::{MAX_TAIL_CALLS, REFLECT_STAGE_KEY, STAGE_TABLE_SLOTS};

/// What a stage asks for after looking at a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The frame is finished with this verdict.
    Done(Verdict),
    /// Continue in the stage registered under this key, with the same
    /// frame. The requesting stage does not resume.
    Transfer(u32),
}

/// One program of the pipeline.
pub trait Stage {
    fn name(&self) -> &'static str;

    fn run(&self, frame: &mut [u8]) -> Step;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("stage key {key} is outside the table (capacity {capacity})")]
    KeyOutOfRange { key: u32, capacity: usize },
}

/// Fixed-capacity table of stages indexed by dense keys `0..N`.
///
/// Filled through `&mut self` before traffic starts; frames only ever see
/// `&self`, so lookups need no locking.
pub struct StageTable<'s, const N: usize> {
    slots: [Option<&'s dyn Stage>; N],
}

impl<'s, const N: usize> Default for StageTable<'s, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s, const N: usize> StageTable<'s, N> {
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Registers `stage` under `key`, returning the stage it replaced.
    pub fn insert(
        &mut self,
        key: u32,
        stage: &'s dyn Stage,
    ) -> Result<Option<&'s dyn Stage>, DispatchError> {
        let slot = self.slot_mut(key)?;
        Ok(slot.replace(stage))
    }

    pub fn remove(&mut self, key: u32) -> Result<Option<&'s dyn Stage>, DispatchError> {
        let slot = self.slot_mut(key)?;
        Ok(slot.take())
    }

    #[inline(always)]
    pub fn get(&self, key: u32) -> Option<&'s dyn Stage> {
        let index = usize::try_from(key).ok()?;
        self.slots.get(index).copied().flatten()
    }

    /// Runs the stage under `key` on `frame`, following every transfer it
    /// requests, and returns the verdict of the last stage reached.
    ///
    /// A missing stage ends the frame with [`Verdict::Pass`]. So does a
    /// chain that asks for more than [`MAX_TAIL_CALLS`] transfers.
    pub fn transfer(&self, key: u32, frame: &mut [u8]) -> Verdict {
        match self.get(key) {
            Some(stage) => self.run_from(stage, frame),
            None => {
                debug!("no stage under key {}, passing frame", key);
                Verdict::Pass
            }
        }
    }

    /// Runs `first`, which need not be in the table, then follows its
    /// transfers through the table.
    fn run_from(&self, first: &'s dyn Stage, frame: &mut [u8]) -> Verdict {
        let mut stage = first;
        let mut transfers = 0;

        loop {
            trace!("entering stage {}", stage.name());

            let next = match stage.run(frame) {
                Step::Done(verdict) => {
                    trace!("stage {} returned {}", stage.name(), verdict);
                    return verdict;
                }
                Step::Transfer(next) => next,
            };

            if transfers == MAX_TAIL_CALLS {
                debug!(
                    "stage {} exceeded {} transfers, passing frame",
                    stage.name(),
                    MAX_TAIL_CALLS
                );
                return Verdict::Pass;
            }
            transfers += 1;

            let Some(found) = self.get(next) else {
                debug!("no stage under key {}, passing frame", next);
                return Verdict::Pass;
            };
            stage = found;
        }
    }

    fn slot_mut(&mut self, key: u32) -> Result<&mut Option<&'s dyn Stage>, DispatchError> {
        usize::try_from(key)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
            .ok_or(DispatchError::KeyOutOfRange { key, capacity: N })
    }
}

/// Stage table sized like the kernel's `STAGES` program array.
pub type Stages<'s> = StageTable<'s, STAGE_TABLE_SLOTS>;

/// An entry stage plus the table it hands frames to.
///
/// The entry stage is not in the table, the same way the attached XDP
/// program is not in `STAGES`.
pub struct Pipeline<'s, const N: usize> {
    entry: &'s dyn Stage,
    table: StageTable<'s, N>,
}

impl<'s, const N: usize> Pipeline<'s, N> {
    pub fn new(entry: &'s dyn Stage, table: StageTable<'s, N>) -> Self {
        Self { entry, table }
    }

    pub fn entry(&self) -> &'s dyn Stage {
        self.entry
    }

    pub fn table(&self) -> &StageTable<'s, N> {
        &self.table
    }

    #[inline(always)]
    pub fn run(&self, frame: &mut [u8]) -> Verdict {
        self.table.run_from(self.entry, frame)
    }
}

impl<'s> Pipeline<'s, STAGE_TABLE_SLOTS> {
    /// Classifier as the entry stage, `next` registered under
    /// [`REFLECT_STAGE_KEY`] if given.
    pub fn standard(classifier: &'s dyn Stage, next: Option<&'s dyn Stage>) -> Self {
        let mut table = Stages::new();
        table.slots[REFLECT_STAGE_KEY as usize] = next;

        Self::new(classifier, table)
    }
}
