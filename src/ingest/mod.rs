pub mod surf_forecast;
