//! Crisis Events
//!
//! The event system owns a single slot for the event awaiting the
//! participant's attention, a queue of blocking triggers deferred while the
//! slot was busy, and the news log.
//!
//! Trials and bailouts are blocking: while one is open the participant cannot
//! submit an action. Expropriation notices and flavor lines are notices; they
//! give way to any blocking trigger and land in the news log instead of the
//! slot when it is already taken.
//!
//! Every open event counts down in progress units. When the countdown runs
//! out the default resolution applies, exactly as if the participant had
//! dismissed it.

pub mod bailout;
pub mod expropriation;
pub mod news;
pub mod trial;

use std::collections::VecDeque;

use harvest_events::{AgentId, EventView, EventViewKind, NewsKind, Verdict};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::economy::EconomicSnapshot;
use crate::error::{CommandError, InvalidCommand};
use crate::treasury::{Population, Treasury};

pub use bailout::{BailoutRequest, Funding};
pub use expropriation::ExpropriationNotice;
pub use news::NewsLog;
pub use trial::{Tally, TrialOutcome, TrialSession};

/// Generates an event ID.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:06}", sequence)
}

/// What occupies the event slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    TrialSession(TrialSession),
    BailoutRequest(BailoutRequest),
    ExpropriationNotice(ExpropriationNotice),
    FlavorNews { text: String },
}

impl EventKind {
    pub fn is_blocking(&self) -> bool {
        matches!(self, EventKind::TrialSession(_) | EventKind::BailoutRequest(_))
    }

    fn news_kind(&self) -> NewsKind {
        match self {
            EventKind::TrialSession(_) => NewsKind::Trial,
            EventKind::BailoutRequest(_) => NewsKind::Bailout,
            EventKind::ExpropriationNotice(_) => NewsKind::Expropriation,
            EventKind::FlavorNews { .. } => NewsKind::Flavor,
        }
    }

    /// One-line description used when the event ends up in the news log.
    fn headline(&self, population: &Population) -> String {
        match self {
            EventKind::TrialSession(trial) => {
                format!("{} stands accused by {}", name_of(population, trial.target), trial.accuser_name)
            }
            EventKind::BailoutRequest(request) => {
                format!("{} asks for a bailout", name_of(population, request.target))
            }
            EventKind::ExpropriationNotice(notice) => format!(
                "{} decreed an expropriation, collecting {}",
                notice.initiator_name, notice.amount_collected
            ),
            EventKind::FlavorNews { text } => text.clone(),
        }
    }
}

fn name_of(population: &Population, id: AgentId) -> String {
    population
        .get(id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// The event in the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenEvent {
    pub id: String,
    pub kind: EventKind,
    /// Progress units left before the default resolution applies
    pub remaining: f64,
}

impl OpenEvent {
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }

    /// Read-only view for the snapshot.
    pub fn view(&self, population: &Population) -> EventView {
        let kind = match &self.kind {
            EventKind::TrialSession(trial) => EventViewKind::Trial {
                target: trial.target,
                target_name: name_of(population, trial.target),
                accuser_name: trial.accuser_name.clone(),
                target_reputation_at_filing: trial.target_reputation_at_filing,
                bail_cost: trial.bail_cost,
            },
            EventKind::BailoutRequest(request) => EventViewKind::Bailout {
                target: request.target,
                target_name: name_of(population, request.target),
                debt: population
                    .get(request.target)
                    .map(|a| (-a.stash).max(0))
                    .unwrap_or(request.debt),
            },
            EventKind::ExpropriationNotice(notice) => EventViewKind::Expropriation {
                initiator_name: notice.initiator_name.clone(),
                amount_collected: notice.amount_collected,
            },
            EventKind::FlavorNews { text } => EventViewKind::Flavor { text: text.clone() },
        };

        EventView {
            id: self.id.clone(),
            blocking: self.is_blocking(),
            remaining: self.remaining,
            kind,
        }
    }
}

/// The participant's answer to the open event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventResponse {
    Vote(Verdict),
    PayBail,
    RescuePrivately,
    RescuePublicly,
    /// Always accepted; applies the default resolution
    Dismiss,
}

/// A blocking event waiting to be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    Trial { target: AgentId },
    Bailout { target: AgentId },
}

impl Trigger {
    /// Whether the trigger still makes sense: a trial target must be live,
    /// a bailout target must still be insolvent.
    pub fn is_applicable(&self, population: &Population) -> bool {
        match *self {
            Trigger::Trial { target } => population.get(target).is_some_and(|a| a.is_live()),
            Trigger::Bailout { target } => {
                population.get(target).is_some_and(|a| a.life.is_insolvent())
            }
        }
    }
}

/// Mutable view of the session the event system works on.
pub struct Commons<'a> {
    pub population: &'a mut Population,
    pub treasury: &'a mut Treasury,
    pub config: &'a EngineConfig,
    pub day: u32,
}

impl Commons<'_> {
    pub fn economics(&self) -> EconomicSnapshot {
        EconomicSnapshot::compute(
            &self.config.economy,
            self.treasury.pool(),
            &self.population.live_stashes(),
            self.treasury.initial_total_wealth(),
        )
    }

    fn cost_of_living(&self) -> i64 {
        self.economics().cost_of_living
    }
}

/// Who did what during the day, as seen by the event checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayReport {
    /// Members that stole, in processing order
    pub thieves: Vec<AgentId>,
    /// Members that crossed into insolvency today
    pub newly_insolvent: Vec<AgentId>,
}

/// Event slot, deferred triggers and news.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSystem {
    open: Option<OpenEvent>,
    deferred: VecDeque<Trigger>,
    news: NewsLog,
    next_event: u64,
}

impl EventSystem {
    pub fn new(news_capacity: usize) -> Self {
        Self {
            open: None,
            deferred: VecDeque::new(),
            news: NewsLog::new(news_capacity),
            next_event: 1,
        }
    }

    pub fn open_event(&self) -> Option<&OpenEvent> {
        self.open.as_ref()
    }

    /// Whether a blocking event is waiting on the participant.
    pub fn is_blocked(&self) -> bool {
        self.open.as_ref().is_some_and(|e| e.is_blocking())
    }

    pub fn deferred(&self) -> impl Iterator<Item = &Trigger> {
        self.deferred.iter()
    }

    pub fn news(&self) -> &NewsLog {
        &self.news
    }

    pub fn news_mut(&mut self) -> &mut NewsLog {
        &mut self.news
    }

    pub fn record(&mut self, day: u32, kind: NewsKind, text: impl Into<String>) {
        self.news.record(day, kind, text);
    }

    fn occupy(&mut self, kind: EventKind, config: &EngineConfig) -> &OpenEvent {
        let remaining = if kind.is_blocking() {
            config.events.event_deadline
        } else {
            config.events.notice_duration
        };
        let id = generate_event_id(self.next_event);
        self.next_event += 1;
        debug!(event = %id, blocking = kind.is_blocking(), "opening event");
        self.open.insert(OpenEvent {
            id,
            kind,
            remaining,
        })
    }

    /// Moves a notice out of the slot into the news log.
    fn archive(&mut self, event: OpenEvent, population: &Population, day: u32) {
        let text = event.kind.headline(population);
        self.news.record(day, NewsKind::Archived, text);
    }

    /// Offers a blocking trigger to the slot.
    ///
    /// Opens it when the slot is free or only holds a notice (which is
    /// archived). Otherwise the trigger is queued for the next day-end. A
    /// trigger that no longer applies, or that cannot be filed, is dropped.
    pub fn raise(&mut self, trigger: Trigger, commons: &mut Commons<'_>) {
        if !trigger.is_applicable(commons.population) {
            return;
        }

        if self.is_blocked() {
            if self.deferred.contains(&trigger) {
                return;
            }
            let text = match trigger {
                Trigger::Trial { target } => format!(
                    "The trial of {} is postponed",
                    name_of(commons.population, target)
                ),
                Trigger::Bailout { target } => format!(
                    "{}'s bailout request waits its turn",
                    name_of(commons.population, target)
                ),
            };
            self.news.record(commons.day, NewsKind::Deferred, text);
            self.deferred.push_back(trigger);
            return;
        }

        let kind = match trigger {
            Trigger::Trial { target } => {
                let cost = commons.cost_of_living();
                match TrialSession::file(commons.population, target, &commons.config.events, cost) {
                    Some(trial) => EventKind::TrialSession(trial),
                    None => {
                        debug!(%target, "no accuser available; trial dropped");
                        return;
                    }
                }
            }
            Trigger::Bailout { target } => match BailoutRequest::raise(commons.population, target) {
                Some(request) => EventKind::BailoutRequest(request),
                None => return,
            },
        };

        if let Some(displaced) = self.open.take() {
            self.archive(displaced, commons.population, commons.day);
        }
        self.occupy(kind, commons.config);
    }

    /// Offers a notice to the slot; it goes straight to the news log when
    /// the slot is taken.
    pub fn publish(&mut self, kind: EventKind, commons: &Commons<'_>) {
        if self.open.is_some() {
            let text = kind.headline(commons.population);
            self.news.record(commons.day, kind.news_kind(), text);
            return;
        }
        self.occupy(kind, commons.config);
    }

    /// Applies the participant's response to the open event.
    ///
    /// A rejected response leaves everything untouched and the event open.
    pub fn respond<R: Rng>(
        &mut self,
        event_id: &str,
        response: EventResponse,
        commons: &mut Commons<'_>,
        rng: &mut R,
    ) -> Result<(), CommandError> {
        let event = self
            .open
            .as_ref()
            .filter(|e| e.id == event_id)
            .ok_or_else(|| InvalidCommand::NoSuchEvent(event_id.to_string()))?;
        let participant = &commons.population.participant;

        match (&event.kind, response) {
            (_, EventResponse::Dismiss) => {
                self.resolve_by_default(commons, rng);
                Ok(())
            }
            (EventKind::TrialSession(trial), EventResponse::Vote(verdict)) => {
                if participant.is_expelled() {
                    return Err(InvalidCommand::Expelled.into());
                }
                if trial.target.is_participant() {
                    return Err(InvalidCommand::UnsupportedResponse.into());
                }
                let trial = trial.clone();
                self.open = None;
                self.conclude_trial(&trial, Some(verdict), commons, rng);
                Ok(())
            }
            (EventKind::TrialSession(trial), EventResponse::PayBail) => {
                if participant.is_expelled() {
                    return Err(InvalidCommand::Expelled.into());
                }
                let available = participant.agent.stash;
                if available < trial.bail_cost {
                    return Err(CommandError::InsufficientFunds {
                        needed: trial.bail_cost,
                        available,
                    });
                }
                let trial = trial.clone();
                self.open = None;

                let payer = &mut commons.population.participant.agent;
                payer.stash -= trial.bail_cost;
                if !trial.target.is_participant() {
                    payer.adjust_reputation(commons.config.events.bail_reputation_bonus);
                }
                commons.treasury.deposit(trial.bail_cost);

                let name = name_of(commons.population, trial.target);
                info!(target_id = %trial.target, bail = trial.bail_cost, "bail paid");
                self.news.record(
                    commons.day,
                    NewsKind::Trial,
                    format!("Bail of {} paid for {}; the trial is cancelled", trial.bail_cost, name),
                );
                Ok(())
            }
            (EventKind::BailoutRequest(request), EventResponse::RescuePrivately)
            | (EventKind::BailoutRequest(request), EventResponse::RescuePublicly) => {
                let funding = if response == EventResponse::RescuePrivately {
                    Funding::Private
                } else {
                    Funding::Public
                };
                let cost = commons.cost_of_living();
                let request = request.clone();
                let paid = request.rescue(
                    commons.population,
                    commons.treasury,
                    funding,
                    &commons.config.events,
                    cost,
                )?;
                self.open = None;

                let name = name_of(commons.population, request.target);
                let payer = match funding {
                    Funding::Private => commons.population.participant.agent.name.clone(),
                    Funding::Public => "the treasury".to_string(),
                };
                info!(target_id = %request.target, paid, ?funding, "bailout granted");
                self.news.record(
                    commons.day,
                    NewsKind::Bailout,
                    format!("{} rescued by {} for {}", name, payer, paid),
                );
                Ok(())
            }
            _ => Err(InvalidCommand::UnsupportedResponse.into()),
        }
    }

    /// Decrements the open event's countdown and applies the default
    /// resolution when it runs out.
    pub fn advance_countdown<R: Rng>(
        &mut self,
        increment: f64,
        commons: &mut Commons<'_>,
        rng: &mut R,
    ) {
        let Some(event) = self.open.as_mut() else {
            return;
        };
        event.remaining -= increment;
        if event.remaining <= 0.0 {
            debug!(event = %event.id, "event timed out");
            self.resolve_by_default(commons, rng);
        }
    }

    /// Default outcomes: a trial is tallied without the participant's vote,
    /// a bailout is declined and a notice is archived.
    fn resolve_by_default<R: Rng>(&mut self, commons: &mut Commons<'_>, rng: &mut R) {
        let Some(event) = self.open.take() else {
            return;
        };

        match event.kind {
            EventKind::TrialSession(trial) => self.conclude_trial(&trial, None, commons, rng),
            EventKind::BailoutRequest(request) => {
                let name = name_of(commons.population, request.target);
                self.news.record(
                    commons.day,
                    NewsKind::Bailout,
                    format!("Nobody answered {}'s plea for help", name),
                );
            }
            notice => {
                let text = notice.headline(commons.population);
                self.news.record(commons.day, NewsKind::Archived, text);
            }
        }
    }

    fn conclude_trial<R: Rng>(
        &mut self,
        trial: &TrialSession,
        vote: Option<Verdict>,
        commons: &mut Commons<'_>,
        rng: &mut R,
    ) {
        let name = name_of(commons.population, trial.target);
        let outcome = trial.resolve(
            commons.population,
            commons.treasury,
            vote,
            &commons.config.events,
            rng,
        );

        let text = match outcome {
            TrialOutcome::Convicted { confiscated, tally } => {
                info!(target_id = %trial.target, confiscated, "trial convicted");
                format!(
                    "{} convicted (guilty {}, innocent {}); {} returned to the granary",
                    name, tally.guilty, tally.innocent, confiscated
                )
            }
            TrialOutcome::Acquitted { tally } => {
                info!(target_id = %trial.target, "trial acquitted");
                format!(
                    "{} acquitted (guilty {}, innocent {})",
                    name, tally.guilty, tally.innocent
                )
            }
            TrialOutcome::Vacated => format!("The trial of {} was vacated", name),
        };
        self.news.record(commons.day, NewsKind::Trial, text);
    }

    /// The participant decrees an expropriation.
    pub fn decree(&mut self, commons: &mut Commons<'_>) -> Result<(), CommandError> {
        let participant = &commons.population.participant;
        if participant.is_expelled() {
            return Err(InvalidCommand::Expelled.into());
        }
        if participant.decreed_today {
            return Err(InvalidCommand::AlreadyDecreed.into());
        }
        if !commons
            .population
            .ranks_within(AgentId::PARTICIPANT, commons.config.events.authority_rank)
        {
            return Err(InvalidCommand::NotAuthorized.into());
        }

        commons.population.participant.decreed_today = true;
        self.expropriate(AgentId::PARTICIPANT, commons);
        Ok(())
    }

    fn expropriate(&mut self, initiator: AgentId, commons: &mut Commons<'_>) {
        match expropriation::levy(
            commons.config,
            commons.population,
            commons.treasury,
            initiator,
        ) {
            Some(notice) => {
                info!(%initiator, collected = notice.amount_collected, "expropriation decreed");
                self.publish(EventKind::ExpropriationNotice(notice), commons);
            }
            None => {
                let name = name_of(commons.population, initiator);
                self.news.record(
                    commons.day,
                    NewsKind::Expropriation,
                    format!("{} called for an expropriation, but the granary is full", name),
                );
            }
        }
    }

    /// Day-end event checks, run after every action and cost is settled.
    ///
    /// In order: drop a stale open event, re-offer deferred triggers, file
    /// trials against the day's thieves, raise bailouts for the newly
    /// insolvent, let a respected agent levy the stashes during a crisis and
    /// maybe publish a flavor line.
    pub fn day_end_checks<R: Rng>(
        &mut self,
        report: &DayReport,
        commons: &mut Commons<'_>,
        rng: &mut R,
    ) {
        self.drop_stale(commons);
        self.reoffer_deferred(commons);

        for &thief in &report.thieves {
            if commons.population.get(thief).is_some_and(|a| a.is_live())
                && rng.gen_bool(commons.config.events.trial_filing_chance.clamp(0.0, 1.0))
            {
                self.raise(Trigger::Trial { target: thief }, commons);
            }
        }

        for &target in &report.newly_insolvent {
            self.raise(Trigger::Bailout { target }, commons);
        }

        let economics = commons.economics();
        let crisis_line = economics.safe_level as f64 * commons.config.policy.crisis_pool_ratio;
        if (commons.treasury.pool() as f64) < crisis_line {
            if let Some(initiator) = expropriation::defensive_initiator(
                commons.population,
                commons.config.events.authority_rank,
            ) {
                let chance = commons.config.events.defensive_expropriation_chance;
                if rng.gen_bool(chance.clamp(0.0, 1.0)) {
                    self.expropriate(initiator, commons);
                }
            }
        }

        if rng.gen_bool(commons.config.events.flavor_news_chance.clamp(0.0, 1.0)) {
            let sentiment = commons.economics().sentiment;
            let text = news::flavor_line(sentiment, rng).to_string();
            self.publish(EventKind::FlavorNews { text }, commons);
        }
    }

    /// Archives an open blocking event whose subject is gone: a trial whose
    /// target was removed, or a bailout whose target recovered or died.
    fn drop_stale(&mut self, commons: &Commons<'_>) {
        let stale = match self.open.as_ref().map(|e| &e.kind) {
            Some(EventKind::TrialSession(trial)) => !commons
                .population
                .get(trial.target)
                .is_some_and(|a| a.is_live()),
            Some(EventKind::BailoutRequest(request)) => request.is_stale(commons.population),
            _ => false,
        };
        if stale {
            if let Some(event) = self.open.take() {
                self.archive(event, commons.population, commons.day);
            }
        }
    }

    /// Opens the first deferred trigger that still applies once the slot is
    /// no longer blocked. Triggers that no longer apply are discarded.
    fn reoffer_deferred(&mut self, commons: &mut Commons<'_>) {
        self.deferred.retain(|t| t.is_applicable(commons.population));
        if self.is_blocked() {
            return;
        }
        while let Some(trigger) = self.deferred.pop_front() {
            self.raise(trigger, commons);
            if self.is_blocked() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, Participant};
    use harvest_events::{LifeState, Personality};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn population() -> Population {
        let agents = (1..=6)
            .map(|i| {
                Agent::new(
                    AgentId(i),
                    format!("Citizen #{}", i),
                    Personality::Altruist,
                    40 + i as u8,
                    30,
                )
            })
            .collect();
        Population::new(agents, Participant::new("You", 90, 100))
    }

    fn quiet_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.events.flavor_news_chance = 0.0;
        config.events.defensive_expropriation_chance = 0.0;
        config
    }

    fn make_insolvent(pop: &mut Population, id: AgentId, stash: i64) {
        let member = pop.get_mut(id).unwrap();
        member.stash = stash;
        member.life = LifeState::Insolvent { days: 0 };
    }

    #[test]
    fn test_generate_event_id() {
        assert_eq!(generate_event_id(1), "evt_000001");
        assert_eq!(generate_event_id(123456), "evt_123456");
    }

    #[test]
    fn test_second_blocking_trigger_is_deferred() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        make_insolvent(&mut pop, AgentId(1), -5);
        make_insolvent(&mut pop, AgentId(2), -5);
        let mut events = EventSystem::new(50);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 3,
        };

        events.raise(Trigger::Bailout { target: AgentId(1) }, &mut commons);
        let first_id = events.open_event().unwrap().id.clone();
        events.raise(Trigger::Bailout { target: AgentId(2) }, &mut commons);
        // raising the same trigger again does not queue it twice
        events.raise(Trigger::Bailout { target: AgentId(2) }, &mut commons);

        assert_eq!(events.open_event().unwrap().id, first_id);
        assert_eq!(events.deferred().count(), 1);
        assert_eq!(events.news().latest().unwrap().kind, NewsKind::Deferred);
        assert_eq!(
            events.news().entries().filter(|e| e.kind == NewsKind::Deferred).count(),
            1
        );
    }

    #[test]
    fn test_blocking_trigger_displaces_notice() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        make_insolvent(&mut pop, AgentId(4), -5);
        let mut events = EventSystem::new(50);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.publish(
            EventKind::FlavorNews {
                text: "Quiet day".to_string(),
            },
            &commons,
        );
        assert!(!events.is_blocked());

        events.raise(Trigger::Bailout { target: AgentId(4) }, &mut commons);

        assert!(events.is_blocked());
        let archived = events.news().latest().unwrap();
        assert_eq!(archived.kind, NewsKind::Archived);
        assert_eq!(archived.text, "Quiet day");
    }

    #[test]
    fn test_notice_goes_to_log_when_slot_taken() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        make_insolvent(&mut pop, AgentId(4), -5);
        let mut events = EventSystem::new(50);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.raise(Trigger::Bailout { target: AgentId(4) }, &mut commons);
        events.publish(
            EventKind::FlavorNews {
                text: "Rain again".to_string(),
            },
            &commons,
        );

        assert!(matches!(
            events.open_event().unwrap().kind,
            EventKind::BailoutRequest(_)
        ));
        let entry = events.news().latest().unwrap();
        assert_eq!(entry.kind, NewsKind::Flavor);
        assert_eq!(entry.text, "Rain again");
    }

    #[test]
    fn test_unknown_event_id_rejected() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        let err = events
            .respond("evt_999999", EventResponse::Dismiss, &mut commons, &mut rng)
            .unwrap_err();

        assert_eq!(
            err,
            CommandError::from(InvalidCommand::NoSuchEvent("evt_999999".to_string()))
        );
    }

    #[test]
    fn test_bail_requires_funds_and_keeps_event_open() {
        let config = quiet_config();
        let mut pop = population();
        pop.participant.agent.stash = 10;
        let mut treasury = Treasury::new(500, 200);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.raise(Trigger::Trial { target: AgentId(2) }, &mut commons);
        let id = events.open_event().unwrap().id.clone();

        let err = events
            .respond(&id, EventResponse::PayBail, &mut commons, &mut rng)
            .unwrap_err();

        assert!(matches!(err, CommandError::InsufficientFunds { .. }));
        assert_eq!(events.open_event().unwrap().id, id);
        assert_eq!(commons.population.participant.agent.stash, 10);
    }

    #[test]
    fn test_paying_bail_cancels_trial() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.raise(Trigger::Trial { target: AgentId(2) }, &mut commons);
        let id = events.open_event().unwrap().id.clone();
        let bail = match &events.open_event().unwrap().kind {
            EventKind::TrialSession(trial) => trial.bail_cost,
            other => panic!("unexpected event {:?}", other),
        };
        let pool_before = commons.treasury.pool();

        events
            .respond(&id, EventResponse::PayBail, &mut commons, &mut rng)
            .unwrap();

        assert!(events.open_event().is_none());
        assert_eq!(commons.population.participant.agent.stash, 100 - bail);
        assert_eq!(commons.population.participant.agent.reputation, 98);
        assert_eq!(commons.treasury.pool(), pool_before + bail);
        assert!(commons.population.get(AgentId(2)).unwrap().is_live());
    }

    #[test]
    fn test_target_cannot_vote_in_own_trial() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.raise(Trigger::Trial { target: AgentId::PARTICIPANT }, &mut commons);
        let id = events.open_event().unwrap().id.clone();

        let err = events
            .respond(&id, EventResponse::Vote(Verdict::Innocent), &mut commons, &mut rng)
            .unwrap_err();
        assert_eq!(err, CommandError::from(InvalidCommand::UnsupportedResponse));

        let err = events
            .respond(&id, EventResponse::RescuePublicly, &mut commons, &mut rng)
            .unwrap_err();
        assert_eq!(err, CommandError::from(InvalidCommand::UnsupportedResponse));
        assert!(events.open_event().is_some());
    }

    #[test]
    fn test_timeout_applies_default_resolution() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        make_insolvent(&mut pop, AgentId(1), -5);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 2,
        };

        events.raise(Trigger::Bailout { target: AgentId(1) }, &mut commons);
        events.advance_countdown(100.0, &mut commons, &mut rng);
        assert!(events.is_blocked());
        assert_eq!(events.open_event().unwrap().remaining, 50.0);

        events.advance_countdown(50.0, &mut commons, &mut rng);

        assert!(events.open_event().is_none());
        assert_eq!(events.news().latest().unwrap().kind, NewsKind::Bailout);
        // declined: nothing changed for the target
        let target = commons.population.get(AgentId(1)).unwrap();
        assert_eq!(target.stash, -5);
        assert!(target.life.is_insolvent());
    }

    #[test]
    fn test_deferred_trigger_opens_at_day_end() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        make_insolvent(&mut pop, AgentId(1), -5);
        make_insolvent(&mut pop, AgentId(2), -5);
        make_insolvent(&mut pop, AgentId(3), -5);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 4,
        };

        events.raise(Trigger::Bailout { target: AgentId(1) }, &mut commons);
        events.raise(Trigger::Bailout { target: AgentId(2) }, &mut commons);
        events.raise(Trigger::Bailout { target: AgentId(3) }, &mut commons);
        let id = events.open_event().unwrap().id.clone();
        events
            .respond(&id, EventResponse::Dismiss, &mut commons, &mut rng)
            .unwrap();
        // agent 2 recovered on its own in the meantime
        commons.population.get_mut(AgentId(2)).unwrap().restore(10);

        events.day_end_checks(&DayReport::default(), &mut commons, &mut rng);

        match &events.open_event().unwrap().kind {
            EventKind::BailoutRequest(request) => assert_eq!(request.target, AgentId(3)),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(events.deferred().count(), 0);
    }

    #[test]
    fn test_stale_trial_is_archived_at_day_end() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(500, 200);
        let mut events = EventSystem::new(50);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 4,
        };

        events.raise(Trigger::Trial { target: AgentId(5) }, &mut commons);
        commons.population.get_mut(AgentId(5)).unwrap().remove();

        events.day_end_checks(&DayReport::default(), &mut commons, &mut rng);

        assert!(events.open_event().is_none());
        assert_eq!(events.news().latest().unwrap().kind, NewsKind::Archived);
    }

    #[test]
    fn test_decree_rules() {
        let config = quiet_config();
        let mut pop = population();
        let mut treasury = Treasury::new(0, 200);
        let mut events = EventSystem::new(50);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        events.decree(&mut commons).unwrap();
        assert!(commons.treasury.pool() > 0);
        assert_eq!(commons.population.participant.agent.reputation, 65);
        assert!(matches!(
            events.open_event().unwrap().kind,
            EventKind::ExpropriationNotice(_)
        ));

        let err = events.decree(&mut commons).unwrap_err();
        assert_eq!(err, CommandError::from(InvalidCommand::AlreadyDecreed));
    }

    #[test]
    fn test_low_rank_cannot_decree() {
        let config = quiet_config();
        let mut pop = population();
        pop.participant.agent.reputation = 5;
        let mut treasury = Treasury::new(0, 200);
        let mut events = EventSystem::new(50);
        let mut commons = Commons {
            population: &mut pop,
            treasury: &mut treasury,
            config: &config,
            day: 1,
        };

        let err = events.decree(&mut commons).unwrap_err();

        assert_eq!(err, CommandError::from(InvalidCommand::NotAuthorized));
        assert_eq!(commons.treasury.pool(), 0);
        assert!(!commons.population.participant.decreed_today);
    }
}
