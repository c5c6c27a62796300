use crate::data::user::UserRepository;
use crate::model::period::{Period, RollingMetric};
use crate::model::points::{ActionContext, Difficulty, PointsAction};
use crate::model::user::UserRecord;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::user::UserFactory};

mod leaderboard;
mod reset_rolling;
mod save;
mod top_by;
