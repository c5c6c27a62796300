use crate::data::giveaway::GiveawayRepository;
use crate::model::giveaway::Giveaway;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::giveaway::GiveawayFactory};

mod add_entrant;
mod create;
mod find_due;
mod mark_ended;
