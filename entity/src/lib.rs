pub mod giveaway;
pub mod giveaway_entrant;
pub mod hall_of_fame;
pub mod period_marker;
pub mod user;

pub mod prelude {
    pub use super::giveaway::Entity as Giveaway;
    pub use super::giveaway_entrant::Entity as GiveawayEntrant;
    pub use super::hall_of_fame::Entity as HallOfFame;
    pub use super::period_marker::Entity as PeriodMarker;
    pub use super::user::Entity as User;
}
