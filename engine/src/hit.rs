//! Pointer hit-testing against regions recorded at draw time.

use fitsyn_types::ui::Region;

use crate::forms::{LoginFocus, SignUpFocus};
use crate::home::HomeAction;
use crate::settings::SettingsRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Hamburger,
    Mute,
    UserControl,
    /// Body of the account dropdown.
    Dropdown,
    DropdownSignOut,
    MenuBackdrop,
    MenuPanel,
    MenuClose,
    MenuEntry(usize),
    Home(HomeAction),
    Login(LoginFocus),
    LoginShowPassword,
    SignUp(SignUpFocus),
    SignUpShowPassword,
    Settings(SettingsRow),
    NotFoundHome,
    NotFoundBack,
}

/// Regions in draw order. Later entries sit on top.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    targets: Vec<(Region, ClickTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn record(&mut self, region: Region, target: ClickTarget) {
        if region.width == 0 || region.height == 0 {
            return;
        }
        self.targets.push((region, target));
    }

    /// Topmost target under the pointer.
    #[must_use]
    pub fn target_at(&self, column: u16, row: u16) -> Option<ClickTarget> {
        self.targets
            .iter()
            .rev()
            .find(|(region, _)| region.contains(column, row))
            .map(|(_, target)| *target)
    }

    #[must_use]
    pub fn region_of(&self, target: ClickTarget) -> Option<Region> {
        self.targets
            .iter()
            .rev()
            .find(|(_, t)| *t == target)
            .map(|(region, _)| *region)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
