mod giveaway;
mod hall_of_fame;
mod period_marker;
mod user;
