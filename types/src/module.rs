//! Static registry of the embedded sub-applications.

/// One externally hosted sub-application reachable from the shell.
///
/// Descriptors are fixed at build time. `route` is the shell path that mounts
/// the module, `url` is the opaque address loaded into its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleDescriptor {
    pub route: &'static str,
    pub url: &'static str,
    pub title: &'static str,
    /// Short line shown under the title in the navigation menu.
    pub tagline: &'static str,
    /// Longer blurb used by the home page module grid.
    pub description: &'static str,
}

impl ModuleDescriptor {
    /// Message shown by the loading presentation while the frame loads.
    #[must_use]
    pub fn loading_message(&self) -> String {
        format!("Loading {}…", self.title)
    }
}

pub static MODULES: [ModuleDescriptor; 10] = [
    ModuleDescriptor {
        route: "/workout-generator",
        url: "https://openai-workout-generator.vercel.app/",
        title: "AI Workout Generator",
        tagline: "Generate custom workouts",
        description: "Get personalized workouts powered by AI based on your goals and fitness level.",
    },
    ModuleDescriptor {
        route: "/form-assistant",
        url: "https://ai-workout-assistant-ten.vercel.app/",
        title: "AI Form Assistant",
        tagline: "Perfect your form",
        description: "Real-time form correction and guidance for perfect technique.",
    },
    ModuleDescriptor {
        route: "/exercise-library",
        url: "https://library-psi-three.vercel.app/",
        title: "Exercise Library",
        tagline: "Browse exercises",
        description: "Comprehensive library of exercises with detailed instructions.",
    },
    ModuleDescriptor {
        route: "/strength-arena",
        url: "https://keen-torte-50546a.netlify.app/",
        title: "Strength Arena",
        tagline: "Compete & challenge",
        description: "Challenge yourself and compete with others in strength challenges.",
    },
    ModuleDescriptor {
        route: "/nutrition",
        url: "https://nutrition-ai-lovat.vercel.app/",
        title: "AI Nutrition",
        tagline: "Smart meal planning",
        description: "Smart meal planning and nutrition tracking tailored to you.",
    },
    ModuleDescriptor {
        route: "/tracker",
        url: "https://tracker-lilac-xi.vercel.app/",
        title: "Tracker",
        tagline: "Track your progress",
        description: "Track your workouts, progress, and achievements over time.",
    },
    ModuleDescriptor {
        route: "/fitmatrix",
        url: "https://velvety-arithmetic-6f8aee.netlify.app/",
        title: "FitMatrix",
        tagline: "Interactive workouts",
        description: "Interactive workout grid for structured training sessions.",
    },
    ModuleDescriptor {
        route: "/smash-card",
        url: "https://sweet-horse-372fab.netlify.app/",
        title: "Smash Card",
        tagline: "Workout challenges",
        description: "Quick workout challenges to push your limits.",
    },
    ModuleDescriptor {
        route: "/fitmap",
        url: "https://fitnessmap.vercel.app/",
        title: "FitMap",
        tagline: "Find fitness spots",
        description: "Discover fitness spots, gyms, and outdoor workout locations.",
    },
    ModuleDescriptor {
        route: "/yoga",
        url: "https://yoga-gold-nu.vercel.app/",
        title: "AI Yoga",
        tagline: "Guided yoga sessions",
        description: "Guided yoga sessions with AI-powered pose detection.",
    },
];

/// Look up the module mounted at `route`.
#[must_use]
pub fn by_route(route: &str) -> Option<&'static ModuleDescriptor> {
    MODULES.iter().find(|module| module.route == route)
}
