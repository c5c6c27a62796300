use crate::data::hall_of_fame::HallOfFameRepository;
use crate::model::period::{Champion, Period, PeriodSnapshot};
use chrono::Utc;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod record_champions;
