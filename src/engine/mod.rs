//! The itinerary mutation engine.
//!
//! One call applies one typed [`Action`] to an [`Itinerary`] and returns the
//! updated value plus a human-readable summary. The engine holds no state
//! between invocations and mutates a private clone, so a failed operation —
//! including the second half of a compound Replace or Move — leaves the
//! caller's itinerary untouched.

pub mod estimates;

use std::sync::Arc;

use tracing::info;

use crate::error::{EngineError, Result};
use crate::resolver::PlaceResolver;
use crate::types::{Action, ActionKind, Activity, Day, Itinerary};

/// How many candidates a find-and-add distributes
const FIND_AND_ADD_LIMIT: usize = 3;

/// The result of a successful mutation
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The full updated itinerary; the caller persists this back
    pub itinerary: Itinerary,
    /// Activities the operation created, removed, or relocated
    pub activities: Vec<Activity>,
    /// User-facing summary, e.g. "Added Louvre Museum to Day 2 morning"
    pub message: String,
}

/// Applies typed actions to itineraries, resolving place subjects through
/// the injected [`PlaceResolver`]
pub struct MutationEngine {
    resolver: Arc<dyn PlaceResolver>,
}

impl MutationEngine {
    pub fn new(resolver: Arc<dyn PlaceResolver>) -> Self {
        Self { resolver }
    }

    /// Execute one mutation. Every failure leaves `itinerary` unmodified;
    /// the updated value is only ever returned on full success.
    pub async fn apply(
        &self,
        itinerary: &Itinerary,
        action: &Action,
        destination: &str,
    ) -> Result<MutationOutcome> {
        let outcome = match action.kind {
            ActionKind::Add => self.add_activity(itinerary, action, destination).await,
            ActionKind::Remove => self.remove_activity(itinerary, action),
            ActionKind::Replace => self.replace_activity(itinerary, action, destination).await,
            ActionKind::Move => self.move_activity(itinerary, action),
            ActionKind::FindAndAdd => self.find_and_add(itinerary, action, destination).await,
            ActionKind::AddDay => Ok(add_day(itinerary)),
            ActionKind::RemoveDay => remove_day(itinerary, action),
            ActionKind::Modify => Err(EngineError::UnsupportedModification(
                "modifying an activity in place is not supported".to_string(),
            )),
        }?;

        info!(
            target: "tripcraft::engine",
            kind = ?action.kind,
            activities = outcome.activities.len(),
            "{}",
            outcome.message
        );
        Ok(outcome)
    }

    /// Resolve the action's subject (explicit place name, else category
    /// list) into ranked candidates via the resolver
    async fn resolve_subject(
        &self,
        action: &Action,
        destination: &str,
    ) -> Result<(String, Vec<crate::types::PlaceCandidate>)> {
        let query = if let Some(name) = &action.details.place_name {
            format!("{} in {}", name, destination)
        } else if !action.details.category.is_empty() {
            format!("{} in {}", action.details.category.join(" "), destination)
        } else {
            return Err(EngineError::MissingSubject);
        };

        let candidates = self.resolver.search(&query).await?;
        Ok((query, candidates))
    }

    async fn add_activity(
        &self,
        itinerary: &Itinerary,
        action: &Action,
        destination: &str,
    ) -> Result<MutationOutcome> {
        let day_number = require_day(action)?;
        let slot_label = action
            .target
            .time_slot
            .clone()
            .unwrap_or_else(|| "morning".to_string());

        // resolve the subject before touching the clone so a lookup failure
        // costs nothing
        let (query, candidates) = self.resolve_subject(action, destination).await?;
        let candidate = candidates
            .first()
            .ok_or(EngineError::PlaceNotFound { query })?;
        let activity = Activity::from_candidate(candidate, destination);

        let mut updated = itinerary.clone();
        let day = find_day_mut(&mut updated, day_number)?;
        let slot = day
            .slot_mut(&slot_label)
            .ok_or_else(|| EngineError::SlotNotFound {
                day: day_number,
                requested: slot_label.clone(),
                available: itinerary
                    .day(day_number)
                    .map(Day::available_slots)
                    .unwrap_or_default(),
            })?;
        let slot_name = slot.name().to_string();
        slot.activities.push(activity.clone());

        let message = format!("Added {} to Day {} {}", activity.name, day_number, slot_name);
        Ok(MutationOutcome {
            itinerary: updated,
            activities: vec![activity],
            message,
        })
    }

    fn remove_activity(&self, itinerary: &Itinerary, action: &Action) -> Result<MutationOutcome> {
        let day_number = require_day(action)?;
        let mut updated = itinerary.clone();
        let (removed, slot_name) = take_activity(
            &mut updated,
            day_number,
            action.target.activity_id.as_deref(),
            action.target.activity_name.as_deref(),
        )?;

        let message = format!("Removed {} from Day {} {}", removed.name, day_number, slot_name);
        Ok(MutationOutcome {
            itinerary: updated,
            activities: vec![removed],
            message,
        })
    }

    /// Remove-then-add as one logical transaction: the add half works on the
    /// same private clone, so an add failure discards the removal with it
    async fn replace_activity(
        &self,
        itinerary: &Itinerary,
        action: &Action,
        destination: &str,
    ) -> Result<MutationOutcome> {
        let day_number = require_day(action)?;

        let mut updated = itinerary.clone();
        let (removed, slot_name) = take_activity(
            &mut updated,
            day_number,
            action.target.activity_id.as_deref(),
            action.target.activity_name.as_deref(),
        )?;

        let (query, candidates) = self.resolve_subject(action, destination).await?;
        let candidate = candidates
            .first()
            .ok_or(EngineError::PlaceNotFound { query })?;
        let replacement = Activity::from_candidate(candidate, destination);

        let day = find_day_mut(&mut updated, day_number)?;
        let slot = day
            .slot_mut(&slot_name)
            .ok_or_else(|| EngineError::SlotNotFound {
                day: day_number,
                requested: slot_name.clone(),
                available: itinerary
                    .day(day_number)
                    .map(Day::available_slots)
                    .unwrap_or_default(),
            })?;
        slot.activities.push(replacement.clone());

        let message = format!("Replaced {} with {}", removed.name, replacement.name);
        Ok(MutationOutcome {
            itinerary: updated,
            activities: vec![removed, replacement],
            message,
        })
    }

    /// Transfer an activity between two slots. Same transaction shape as
    /// replace: a bad destination discards the removal.
    fn move_activity(&self, itinerary: &Itinerary, action: &Action) -> Result<MutationOutcome> {
        let source_day = require_day(action)?;
        let dest_day = action
            .details
            .new_day
            .ok_or_else(|| EngineError::UnsupportedModification(
                "a move needs a destination day".to_string(),
            ))?;
        let dest_slot_label = action
            .details
            .new_time_slot
            .clone()
            .unwrap_or_else(|| "morning".to_string());

        let mut updated = itinerary.clone();
        let (moved, _) = take_activity(
            &mut updated,
            source_day,
            action.target.activity_id.as_deref(),
            action.target.activity_name.as_deref(),
        )?;

        let day = find_day_mut(&mut updated, dest_day)?;
        let slot = day
            .slot_mut(&dest_slot_label)
            .ok_or_else(|| EngineError::SlotNotFound {
                day: dest_day,
                requested: dest_slot_label.clone(),
                available: itinerary
                    .day(dest_day)
                    .map(Day::available_slots)
                    .unwrap_or_default(),
            })?;
        let slot_name = slot.name().to_string();
        slot.activities.push(moved.clone());

        let message = format!("Moved {} to Day {} {}", moved.name, dest_day, slot_name);
        Ok(MutationOutcome {
            itinerary: updated,
            activities: vec![moved],
            message,
        })
    }

    /// Look up the category list once and spread the top candidates across
    /// the day's slots (or a single requested slot) in resolver rank order
    async fn find_and_add(
        &self,
        itinerary: &Itinerary,
        action: &Action,
        destination: &str,
    ) -> Result<MutationOutcome> {
        let day_number = require_day(action)?;
        if action.details.category.is_empty() {
            return Err(EngineError::MissingSubject);
        }
        let query = format!("{} in {}", action.details.category.join(" "), destination);
        let candidates = self.resolver.search(&query).await?;
        if candidates.is_empty() {
            return Err(EngineError::NothingFound { query });
        }

        let mut updated = itinerary.clone();
        let day = find_day_mut(&mut updated, day_number)?;

        // slot indices to cycle through, in day order
        let slot_indices: Vec<usize> = match &action.target.time_slot {
            Some(label) => {
                let idx = day
                    .time_slots
                    .iter()
                    .position(|s| s.matches(label))
                    .ok_or_else(|| EngineError::SlotNotFound {
                        day: day_number,
                        requested: label.clone(),
                        available: day.available_slots(),
                    })?;
                vec![idx]
            }
            None => (0..day.time_slots.len()).collect(),
        };
        if slot_indices.is_empty() {
            return Err(EngineError::SlotNotFound {
                day: day_number,
                requested: "any".to_string(),
                available: String::new(),
            });
        }

        let mut added = Vec::new();
        for (rank, candidate) in candidates.iter().take(FIND_AND_ADD_LIMIT).enumerate() {
            let activity = Activity::from_candidate(candidate, destination);
            let slot_idx = slot_indices[rank % slot_indices.len()];
            day.time_slots[slot_idx].activities.push(activity.clone());
            added.push(activity);
        }

        let message = format!(
            "Added {} {} suggestion{} to Day {}",
            added.len(),
            action.details.category.join("/"),
            if added.len() == 1 { "" } else { "s" },
            day_number
        );
        Ok(MutationOutcome {
            itinerary: updated,
            activities: added,
            message,
        })
    }
}

/// Append a new day with the three standard empty slots. No failure mode.
fn add_day(itinerary: &Itinerary) -> MutationOutcome {
    let mut updated = itinerary.clone();
    let new_number = updated.days.len() as u32 + 1;
    updated.days.push(Day::with_default_slots(new_number));
    updated.duration = updated.days.len() as u32;

    MutationOutcome {
        message: format!("Added Day {} to your itinerary", new_number),
        itinerary: updated,
        activities: Vec::new(),
    }
}

/// Remove a day and close the gap: every later day shifts down one, default
/// "Day N" titles are rewritten, duration tracks the new length
fn remove_day(itinerary: &Itinerary, action: &Action) -> Result<MutationOutcome> {
    let day_number = require_day(action)?;
    let mut updated = itinerary.clone();
    let index = updated
        .days
        .iter()
        .position(|d| d.day_number == day_number)
        .ok_or_else(|| EngineError::DayNotFound {
            requested: day_number,
            available: itinerary.available_days(),
        })?;

    updated.days.remove(index);
    for day in updated.days.iter_mut().skip(index) {
        let old_number = day.day_number;
        day.day_number = old_number - 1;
        if day.title == format!("Day {}", old_number) {
            day.title = format!("Day {}", day.day_number);
        }
    }
    updated.duration = updated.days.len() as u32;

    Ok(MutationOutcome {
        message: format!("Removed Day {} and renumbered the remaining days", day_number),
        itinerary: updated,
        activities: Vec::new(),
    })
}

fn require_day(action: &Action) -> Result<u32> {
    action.target.day.ok_or_else(|| {
        EngineError::UnsupportedModification("no day number was given".to_string())
    })
}

fn find_day_mut(itinerary: &mut Itinerary, day_number: u32) -> Result<&mut Day> {
    let available = itinerary.available_days();
    itinerary
        .day_mut(day_number)
        .ok_or(EngineError::DayNotFound {
            requested: day_number,
            available,
        })
}

/// Remove the first activity in day order matching the id (exact) or name
/// (case-insensitive substring). Returns the activity and its slot's name.
fn take_activity(
    itinerary: &mut Itinerary,
    day_number: u32,
    activity_id: Option<&str>,
    activity_name: Option<&str>,
) -> Result<(Activity, String)> {
    let day = find_day_mut(itinerary, day_number)?;

    for slot in day.time_slots.iter_mut() {
        let position = slot.activities.iter().position(|activity| {
            if let Some(id) = activity_id {
                activity.id == id
            } else if let Some(name) = activity_name {
                activity.name_matches(name)
            } else {
                false
            }
        });
        if let Some(idx) = position {
            let slot_name = slot.name().to_string();
            return Ok((slot.activities.remove(idx), slot_name));
        }
    }

    Err(EngineError::ActivityNotFound {
        day: day_number,
        subject: activity_id
            .or(activity_name)
            .unwrap_or("(unspecified)")
            .to_string(),
    })
}
