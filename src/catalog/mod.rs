//! The standard roles, alignments and abilities, and a registry to look
//! them up by id.
//!
//! Nothing is registered implicitly: [`Catalog::standard`] lists every
//! built-in, and callers may register their own constructors next to them.
//!
//! ## Example Usage
//!
//! ```
//! use mafia_engine::catalog::Catalog;
//!
//! let catalog = Catalog::standard();
//! let cop = catalog.role("Cop").unwrap();
//! let town = catalog.alignment("Town").unwrap();
//! let once = catalog.modifier("1-Shot").unwrap();
//!
//! let cop = once.apply_role(cop).unwrap();
//! assert_eq!(mafia_engine::roles::role_name(&cop, &town), "Town 1-Shot Cop");
//! assert!(catalog.role("Dragon").is_none());
//! ```

pub mod abilities;
pub mod factions;
pub mod roles;

use rustc_hash::FxHashMap;

use crate::core::ModifierError;
use crate::modifiers::Modifier;
use crate::roles::{Alignment, Role};

/// Builds a fresh role.
pub type RoleCtor = fn() -> Role;

/// Builds a fresh alignment.
pub type AlignmentCtor = fn() -> Alignment;

/// Registry of role and alignment constructors keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    roles: FxHashMap<String, RoleCtor>,
    alignments: FxHashMap<String, AlignmentCtor>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in role and alignment.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        let roles: [(&str, RoleCtor); 40] = [
            ("Vanilla", roles::vanilla),
            ("Cop", roles::cop),
            ("Tracker", roles::tracker),
            ("Watcher", roles::watcher),
            ("Detective", roles::detective),
            ("Neapolitan", roles::neapolitan),
            ("Vanilla Cop", roles::vanilla_cop),
            ("Rolecop", roles::rolecop),
            ("Gunsmith", roles::gunsmith),
            ("Goon Cop", roles::goon_cop),
            ("Motion Detector", roles::motion_detector),
            ("Reporter", roles::reporter),
            ("Role Watcher", roles::role_watcher),
            ("PT Cop", roles::pt_cop),
            ("Traffic Analyst", roles::traffic_analyst),
            ("Doctor", roles::doctor),
            ("Medical Student", roles::medical_student),
            ("Bodyguard", roles::bodyguard),
            ("Shield", roles::shield),
            ("Hider", roles::hider),
            ("Bulletproof", roles::bulletproof),
            ("Jailkeeper", roles::jailkeeper),
            ("Macho", roles::macho),
            ("Ascetic", roles::ascetic),
            ("Commuter", roles::commuter),
            ("Roleblocker", roles::roleblocker),
            ("Rolestopper", roles::rolestopper),
            ("Alien", roles::alien),
            ("Vigilante", roles::vigilante),
            ("Juggernaut", roles::juggernaut),
            ("Ninja", roles::ninja),
            ("Jack of All Trades", roles::jack_of_all_trades),
            ("Universal Backup", roles::universal_backup),
            ("Friendly Neighbor", roles::friendly_neighbor),
            ("Innocent Child", roles::innocent_child),
            ("Mason", roles::mason),
            ("Neighbor", roles::neighbor),
            ("Neighborizer", roles::neighborizer),
            ("Messenger", roles::messenger),
            ("Fruit Vendor", roles::fruit_vendor),
        ];
        for (id, ctor) in roles {
            catalog.register_role(id, ctor);
        }
        catalog.register_alignment("Town", factions::town);
        catalog.register_alignment("Mafia", factions::mafia);
        catalog.register_alignment("Serial Killer", factions::serial_killer);
        catalog
    }

    /// Register a role constructor. Returns `false` if the id is taken.
    pub fn register_role(&mut self, id: impl Into<String>, ctor: RoleCtor) -> bool {
        let id = id.into();
        if self.roles.contains_key(&id) {
            return false;
        }
        self.roles.insert(id, ctor);
        true
    }

    /// Register an alignment constructor. Returns `false` if the id is taken.
    pub fn register_alignment(&mut self, id: impl Into<String>, ctor: AlignmentCtor) -> bool {
        let id = id.into();
        if self.alignments.contains_key(&id) {
            return false;
        }
        self.alignments.insert(id, ctor);
        true
    }

    /// Build a fresh role by id.
    ///
    /// A role's own id may carry more than its registered one, as with
    /// `"Jack of All Trades"`, which lists its trades.
    #[must_use]
    pub fn role(&self, id: &str) -> Option<Role> {
        self.roles.get(id).map(|ctor| ctor())
    }

    /// Build a fresh alignment by id.
    #[must_use]
    pub fn alignment(&self, id: &str) -> Option<Alignment> {
        self.alignments.get(id).map(|ctor| ctor())
    }

    /// Parse a modifier id such as `"2-Shot"` or `"Night 1,3"`.
    pub fn modifier(&self, id: &str) -> Result<Modifier, ModifierError> {
        id.parse()
    }

    /// Registered role ids, sorted.
    #[must_use]
    pub fn role_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered alignment ids, sorted.
    #[must_use]
    pub fn alignment_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.alignments.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered roles and alignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len() + self.alignments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.alignments.is_empty()
    }
}
