mod daily_wisher;
mod health_check;
mod store;
