//! Home page content: hero actions and the Quick Start suggestion.

use chrono::{Datelike, Weekday};
use fitsyn_types::{MODULES, ModuleDescriptor, Route, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    High,
    Medium,
    Low,
}

impl Intensity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workout {
    pub title: &'static str,
    pub minutes: u16,
    pub calories: u16,
    pub intensity: Intensity,
    pub route: &'static str,
}

pub const WORKOUTS: [Workout; 3] = [
    Workout {
        title: "Full Body HIIT",
        minutes: 25,
        calories: 320,
        intensity: Intensity::High,
        route: "/workout-generator",
    },
    Workout {
        title: "Core Strength",
        minutes: 15,
        calories: 150,
        intensity: Intensity::Medium,
        route: "/workout-generator",
    },
    Workout {
        title: "Morning Yoga",
        minutes: 20,
        calories: 100,
        intensity: Intensity::Low,
        route: "/yoga",
    },
];

/// Today's suggested workout and the alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStart {
    pub featured: &'static Workout,
    pub others: [&'static Workout; 2],
}

impl QuickStart {
    /// Sunday-based day index modulo the workout count.
    #[must_use]
    pub fn for_weekday(day: Weekday) -> Self {
        let featured = day.num_days_from_sunday() as usize % WORKOUTS.len();
        let mut others = WORKOUTS
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != featured)
            .map(|(_, w)| w);
        let first = others.next().unwrap_or(&WORKOUTS[0]);
        let second = others.next().unwrap_or(&WORKOUTS[0]);
        Self {
            featured: &WORKOUTS[featured],
            others: [first, second],
        }
    }

    #[must_use]
    pub fn today() -> Self {
        Self::for_weekday(chrono::Local::now().weekday())
    }
}

/// Focusable controls on the home page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    StartTraining,
    SignIn,
    StartWorkout,
    ViewAllWorkouts,
    Workout(usize),
    Module(usize),
}

impl HomeAction {
    #[must_use]
    pub fn route(self, quick_start: &QuickStart) -> Route {
        match self {
            Self::StartTraining | Self::ViewAllWorkouts => Route::resolve("/workout-generator"),
            Self::SignIn => Route::Login,
            Self::StartWorkout => Route::resolve(quick_start.featured.route),
            Self::Workout(idx) => quick_start
                .others
                .get(idx)
                .map_or(Route::Home, |w| Route::resolve(w.route)),
            Self::Module(idx) => MODULES.get(idx).map_or(Route::Home, Route::Module),
        }
    }
}

/// Every home control in tab order. "Sign In" only exists for guests.
#[must_use]
pub fn home_actions(session: &SessionState) -> Vec<HomeAction> {
    let mut actions = vec![HomeAction::StartTraining];
    if !session.is_authenticated() {
        actions.push(HomeAction::SignIn);
    }
    actions.extend([
        HomeAction::StartWorkout,
        HomeAction::ViewAllWorkouts,
        HomeAction::Workout(0),
        HomeAction::Workout(1),
    ]);
    actions.extend((0..MODULES.len()).map(HomeAction::Module));
    actions
}

/// The "Explore Modules" grid.
pub fn explore_modules() -> impl Iterator<Item = &'static ModuleDescriptor> {
    MODULES.iter()
}
