use serde::Serialize;

/// Part of the working day. Decides the click threshold and what the prompt offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
pub enum DayPhase {
    Morning,
    Afternoon,
    Night,
}

impl DayPhase {
    pub const ALL: [DayPhase; 3] = [DayPhase::Morning, DayPhase::Afternoon, DayPhase::Night];

    pub fn index(self) -> usize {
        match self {
            DayPhase::Morning => 0,
            DayPhase::Afternoon => 1,
            DayPhase::Night => 2,
        }
    }

    /// The phase that follows within one day, `None` after the night.
    pub fn next(self) -> Option<DayPhase> {
        match self {
            DayPhase::Morning => Some(DayPhase::Afternoon),
            DayPhase::Afternoon => Some(DayPhase::Night),
            DayPhase::Night => None,
        }
    }

    /// Text on the prompt button.
    pub fn prompt_label(self) -> &'static str {
        match self {
            DayPhase::Morning => "Eat",
            DayPhase::Afternoon => "Break",
            DayPhase::Night => "Sleep",
        }
    }

    /// Activity the player enters by accepting this phase's prompt.
    pub fn activity(self) -> Activity {
        match self {
            DayPhase::Morning => Activity::Eating,
            DayPhase::Afternoon => Activity::OnBreak,
            DayPhase::Night => Activity::Sleeping,
        }
    }

    /// Ending reached when too many of this phase's prompts were missed.
    pub fn burnout(self) -> EndState {
        match self {
            DayPhase::Morning => EndState::Starved,
            DayPhase::Afternoon => EndState::Exhausted,
            DayPhase::Night => EndState::SleepDeprived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Activity {
    Working,
    Eating,
    Sleeping,
    OnBreak,
}

impl Activity {
    /// Initial text of the activity screen, one dot is appended per click.
    pub fn screen_text(self) -> &'static str {
        match self {
            Activity::Working => "",
            Activity::Eating => "Eating.",
            Activity::Sleeping => "Sleeping.",
            Activity::OnBreak => "Break.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum EndState {
    None,
    Completed,
    Realized,
    TimedOut,
    Starved,
    Exhausted,
    SleepDeprived,
}

impl EndState {
    pub fn message(self) -> &'static str {
        match self {
            EndState::None => "",
            EndState::Completed => "Done!",
            EndState::Realized => "Enlightened!",
            EndState::TimedOut => "Over due.",
            EndState::Starved => "Starving.",
            EndState::Exhausted => "Burnt out.",
            EndState::SleepDeprived => "Sleep deprived.",
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            EndState::None | EndState::Completed => Tint::Neutral,
            EndState::Realized => Tint::Calm,
            EndState::TimedOut
            | EndState::Starved
            | EndState::Exhausted
            | EndState::SleepDeprived => Tint::Alarm,
        }
    }

    pub fn is_burnout(self) -> bool {
        matches!(
            self,
            EndState::Starved | EndState::Exhausted | EndState::SleepDeprived
        )
    }
}

/// Colour hint for screens, left to the presentation layer to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tint {
    Neutral,
    Calm,
    Alarm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(DayPhase::Morning.next(), Some(DayPhase::Afternoon));
        assert_eq!(DayPhase::Afternoon.next(), Some(DayPhase::Night));
        assert_eq!(DayPhase::Night.next(), None);

        for (i, phase) in DayPhase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }

    #[test]
    fn test_prompt_labels_match_activities() {
        assert_eq!(DayPhase::Morning.prompt_label(), "Eat");
        assert_eq!(DayPhase::Morning.activity(), Activity::Eating);
        assert_eq!(DayPhase::Afternoon.prompt_label(), "Break");
        assert_eq!(DayPhase::Afternoon.activity(), Activity::OnBreak);
        assert_eq!(DayPhase::Night.prompt_label(), "Sleep");
        assert_eq!(DayPhase::Night.activity(), Activity::Sleeping);
    }

    #[test]
    fn test_burnout_endings() {
        assert_eq!(DayPhase::Morning.burnout(), EndState::Starved);
        assert_eq!(DayPhase::Afternoon.burnout(), EndState::Exhausted);
        assert_eq!(DayPhase::Night.burnout(), EndState::SleepDeprived);
        assert!(EndState::Exhausted.is_burnout());
        assert!(!EndState::TimedOut.is_burnout());
    }

    #[test]
    fn test_end_messages_and_tints() {
        assert_eq!(EndState::Completed.message(), "Done!");
        assert_eq!(EndState::Realized.message(), "Enlightened!");
        assert_eq!(EndState::TimedOut.message(), "Over due.");
        assert_eq!(EndState::SleepDeprived.message(), "Sleep deprived.");
        assert_eq!(EndState::Completed.tint(), Tint::Neutral);
        assert_eq!(EndState::Realized.tint(), Tint::Calm);
        assert_eq!(EndState::Starved.tint(), Tint::Alarm);
    }

    #[test]
    fn test_display() {
        assert_eq!(DayPhase::Afternoon.to_string(), "Afternoon");
        assert_eq!(Activity::OnBreak.to_string(), "OnBreak");
        assert_eq!(EndState::SleepDeprived.to_string(), "SleepDeprived");
    }
}
