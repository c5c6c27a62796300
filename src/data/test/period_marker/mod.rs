use crate::data::period_marker::PeriodMarkerRepository;
use crate::model::period::Period;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod set_last_run;
