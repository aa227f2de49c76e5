//! Meal planner: a week of days with fixed meal slots.

use chrono::NaiveDate;

use crate::bucket::{bucket_by_day, records_on};
use crate::models::{MealPlan, MealType};
use crate::period::Period;
use crate::source::{MealPlanRequest, MealPreferences};

use super::ViewContext;

/// One day of the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDay<'a> {
    pub date: NaiveDate,
    /// Every meal slot, in slot order, possibly empty
    pub slots: Vec<(MealType, Vec<&'a MealPlan>)>,
    /// Prep plus cook minutes across the day
    pub total_minutes: u32,
}

impl MealDay<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|(_, meals)| meals.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealWeek<'a> {
    pub period: Period,
    pub days: Vec<MealDay<'a>>,
    /// Today's meals in slot order, whether or not today is in the period
    pub today: Vec<&'a MealPlan>,
}

/// Lay out `plans` over the days of `period`.
#[must_use]
pub fn meal_week<'a>(plans: &'a [MealPlan], period: Period, ctx: &ViewContext) -> MealWeek<'a> {
    let days = bucket_by_day(plans, &period.days(), &ctx.zone)
        .into_iter()
        .map(|bucket| {
            let slots = MealType::all()
                .iter()
                .map(|&slot| {
                    let meals: Vec<&'a MealPlan> = bucket
                        .records
                        .iter()
                        .copied()
                        .filter(|m| m.meal_type == slot)
                        .collect();
                    (slot, meals)
                })
                .collect();
            MealDay {
                date: bucket.date,
                total_minutes: bucket.records.iter().map(|m| m.total_minutes()).sum(),
                slots,
            }
        })
        .collect();

    let mut today = records_on(plans, ctx.today, &ctx.zone);
    today.sort_by_key(|m| m.meal_type);

    MealWeek {
        period,
        days,
        today,
    }
}

/// Request asking the backend to plan the week of `period`.
#[must_use]
pub fn plan_request(period: &Period, preferences: MealPreferences) -> MealPlanRequest {
    MealPlanRequest {
        week_start: period.start,
        preferences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use crate::views::fixtures::{ctx, day, from_json};

    fn plans() -> Vec<MealPlan> {
        from_json(
            r#"[
            {"id": "1", "date": "2024-03-10", "mealType": "dinner", "recipe": "Tacos",
             "servings": 4, "prepTime": 20, "cookTime": 15},
            {"id": "2", "date": "2024-03-10", "mealType": "breakfast", "recipe": "Oats",
             "prepTime": 5},
            {"id": "3", "date": "2024-03-12", "mealType": "lunch", "recipe": "Soup"},
            {"id": "4", "date": "2024-03-20", "mealType": "lunch", "recipe": "Salad"}
        ]"#,
        )
    }

    #[test]
    fn test_week_layout() {
        let plans = plans();
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        let week = meal_week(&plans, period, &ctx());

        assert_eq!(week.days.len(), 7);
        let sunday = &week.days[0];
        assert_eq!(sunday.date, day(2024, 3, 10));
        assert_eq!(sunday.slots.len(), 4);
        assert_eq!(sunday.slots[0].1[0].recipe, "Oats");
        assert!(sunday.slots[1].1.is_empty());
        assert_eq!(sunday.slots[2].1[0].recipe, "Tacos");
        assert_eq!(sunday.total_minutes, 40);
        assert!(week.days[1].is_empty());
    }

    #[test]
    fn test_today_panel_in_slot_order() {
        let plans = plans();
        let period = Period::compute(day(2024, 3, 17), PeriodKind::Week);
        let week = meal_week(&plans, period, &ctx());
        let today: Vec<_> = week.today.iter().map(|m| m.recipe.as_str()).collect();
        assert_eq!(today, vec!["Oats", "Tacos"]);
    }

    #[test]
    fn test_plan_request_uses_week_start() {
        let period = Period::compute(day(2024, 3, 13), PeriodKind::Week);
        let request = plan_request(&period, MealPreferences::default());
        assert_eq!(request.week_start, day(2024, 3, 10));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["weekStart"], "2024-03-10");
    }
}
