mod sharing;
mod stopping;
mod sweep;
