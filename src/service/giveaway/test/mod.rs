use std::sync::Arc;

use crate::data::giveaway::GiveawayRepository;
use crate::error::AppError;
use crate::model::giveaway::{EndOutcome, JoinOutcome, StartGiveawayParam};
use crate::service::giveaway::GiveawayService;
use crate::service::testing::StubGateway;
use test_utils::{builder::TestBuilder, factory::giveaway::GiveawayFactory};

mod end;
mod start;
