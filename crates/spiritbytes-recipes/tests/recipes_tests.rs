// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use spiritbytes_core::{
    AdapterType, PaletteColor, RecipeSource, SpiritError, UserFoodPreferences,
};
use spiritbytes_recipes::{DetailOrigin, RecipeDetailClient, RecipeGenerator, template_details};
use spiritbytes_test_utils::{MockCompletion, MockReply, StaticPreferences};

const GOLDEN_MILK: &str = r#"{"recipes":[{"title":"Turmeric Golden Milk","description":"Warm and soothing","ingredients":[{"name":"Turmeric","benefits":"Anti-inflammatory"}]}]}"#;

fn generator(completion: Arc<MockCompletion>, prefs: UserFoodPreferences) -> RecipeGenerator {
    RecipeGenerator::new(
        completion,
        Arc::new(StaticPreferences(prefs)),
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn calm_golden_milk() {
    let completion = Arc::new(MockCompletion::with_responses(vec![GOLDEN_MILK.into()]));
    let batch = generator(completion.clone(), UserFoodPreferences::default())
        .generate_recipes("Calm", 3)
        .await
        .unwrap();

    assert_eq!(batch.source, RecipeSource::Model);
    assert_eq!(batch.recipes.len(), 1);
    let recipe = &batch.recipes[0];
    assert_eq!(recipe.title, "Turmeric Golden Milk");
    assert_eq!(recipe.color, PaletteColor::SandBeige);
    assert_eq!(recipe.ingredients.len(), 1);

    let request = &completion.requests().await[0];
    assert!(request.system_prompt.contains("Generate 3 different recipe ideas"));
    assert!(request.system_prompt.contains("\"Calm\""));
}

#[tokio::test]
async fn ranked_moods_and_preferences_shape_the_prompt() {
    let completion = Arc::new(MockCompletion::with_responses(vec![GOLDEN_MILK.into()]));
    let prefs = UserFoodPreferences::new(["Vegan", "Nut-Free"], "sesame");
    generator(completion.clone(), prefs)
        .generate_recipes_for_moods(&["Happy".into(), "Relaxed".into()], 2)
        .await
        .unwrap();

    let system = &completion.requests().await[0].system_prompt;
    assert!(system.contains("primarily Happy with elements of Relaxed"));
    assert!(system.contains("dominant mood (Happy)"));
    assert!(system.contains("Vegan, Nut-Free"));
    assert!(system.contains("sesame"));
}

#[tokio::test]
async fn numbered_text_is_reconstructed() {
    let text = "Here are some ideas:\n\
        1. Warm Oat Porridge\nComforting and filling.\nIngredients: oats\n- honey\nPreparation: simmer\n\
        2. Chamomile Honey Tea\nGentle before bed.";
    let completion = Arc::new(MockCompletion::with_responses(vec![text.into()]));
    let batch = generator(completion, UserFoodPreferences::default())
        .generate_recipes("Calm", 2)
        .await
        .unwrap();

    assert_eq!(batch.source, RecipeSource::Reconstructed);
    assert_eq!(batch.recipes.len(), 2);
    assert_eq!(batch.recipes[0].title, "Warm Oat Porridge");
    assert_eq!(batch.recipes[1].color, PaletteColor::Terracotta);
    assert_eq!(batch.recipes[1].ingredients[0].name, "Chamomile Tea");
}

#[tokio::test]
async fn empty_answer_is_an_empty_batch() {
    let completion = Arc::new(MockCompletion::with_responses(vec!["   ".into()]));
    let batch = generator(completion, UserFoodPreferences::default())
        .generate_recipes("Sad", 3)
        .await
        .unwrap();
    assert!(batch.is_empty());
}

#[tokio::test]
async fn refusals_and_cut_off_json_are_empty_batches() {
    for answer in [
        "I'm sorry, but I can't help with that request.",
        "{\"recipes\": [{\"title\": \"Lavender Oat",
    ] {
        let completion = Arc::new(MockCompletion::with_responses(vec![answer.into()]));
        let batch = generator(completion, UserFoodPreferences::default())
            .generate_recipes("Calm", 3)
            .await
            .unwrap();
        assert!(batch.is_empty(), "{answer}");
    }
}

#[tokio::test]
async fn missing_key_is_refused_before_any_call() {
    let completion = Arc::new(MockCompletion::unconfigured());
    let err = generator(completion.clone(), UserFoodPreferences::default())
        .generate_recipes("Calm", 3)
        .await
        .unwrap_err();

    assert!(matches!(err, SpiritError::Validation(_)));
    assert_eq!(completion.call_count().await, 0);
}

#[tokio::test]
async fn bad_arguments_are_refused() {
    let completion = Arc::new(MockCompletion::new());
    let generator = generator(completion.clone(), UserFoodPreferences::default());

    assert!(matches!(
        generator.generate_recipes_for_moods(&[], 3).await,
        Err(SpiritError::Validation(_))
    ));
    assert!(matches!(
        generator.generate_recipes("  ", 3).await,
        Err(SpiritError::Validation(_))
    ));
    assert!(matches!(
        generator.generate_recipes("Calm", 0).await,
        Err(SpiritError::Validation(_))
    ));
    assert_eq!(completion.call_count().await, 0);
}

#[tokio::test]
async fn server_error_is_not_replaced_with_curated_recipes() {
    let completion = Arc::new(MockCompletion::new());
    completion.push(MockReply::Status(500)).await;

    let err = generator(completion.clone(), UserFoodPreferences::default())
        .generate_recipes("Calm", 3)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.is_retryable());
    assert_eq!(completion.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_completion_times_out() {
    let completion = Arc::new(MockCompletion::new());
    completion
        .push(MockReply::Delayed(Duration::from_secs(120), GOLDEN_MILK.into()))
        .await;

    let err = generator(completion, UserFoodPreferences::default())
        .generate_recipes("Calm", 3)
        .await
        .unwrap_err();

    match err {
        SpiritError::Timeout { service, duration } => {
            assert_eq!(service, AdapterType::Completion);
            assert_eq!(duration, Duration::from_secs(60));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn details_come_from_the_model() {
    let completion = Arc::new(MockCompletion::with_responses(vec![
        r#"```json
{"difficulty":"Medium","time":"20 Minutes","servings":"2 Servings","ingredients":["2 cups milk","1 tsp turmeric"],"instructions":[{"title":"Heat","description":"Warm the milk."}]}
```"#
            .into(),
    ]));
    let client = RecipeDetailClient::new(
        completion.clone(),
        Arc::new(StaticPreferences(UserFoodPreferences::new(["Vegan"], ""))),
        Duration::from_secs(45),
    );

    let (details, origin) = client
        .get_recipe_details_traced("Turmeric Golden Milk", None)
        .await;

    assert_eq!(origin, DetailOrigin::Model);
    assert_eq!(details.title, "Turmeric Golden Milk");
    assert_eq!(details.difficulty, "Medium");
    assert_eq!(details.instructions[0].title, "Heat");

    let request = &completion.requests().await[0];
    assert!(request.system_prompt.contains("\"Turmeric Golden Milk\""));
    assert!(request.system_prompt.contains("feeling tired"));
    assert!(request.system_prompt.contains("Vegan"));
}

#[tokio::test]
async fn unusable_details_fall_back_to_the_template() {
    let completion = Arc::new(MockCompletion::with_responses(vec!["Sorry, I can't.".into()]));
    let client = RecipeDetailClient::new(
        completion,
        Arc::new(StaticPreferences(UserFoodPreferences::default())),
        Duration::from_secs(45),
    );

    let details = client.get_recipe_details("Berry Smoothie", Some("Happy")).await;
    assert_eq!(details, template_details("Berry Smoothie"));
}

#[tokio::test(start_paused = true)]
async fn slow_details_fall_back_to_the_template() {
    let completion = Arc::new(MockCompletion::new());
    completion
        .push(MockReply::Delayed(
            Duration::from_secs(120),
            r#"{"difficulty":"Hard","ingredients":["1 cup matcha"]}"#.into(),
        ))
        .await;
    let client = RecipeDetailClient::new(
        completion.clone(),
        Arc::new(StaticPreferences(UserFoodPreferences::default())),
        Duration::from_secs(45),
    );

    let (details, origin) = client
        .get_recipe_details_traced("Matcha Latte", Some("Tired"))
        .await;

    assert_eq!(origin, DetailOrigin::Template);
    assert_eq!(details, template_details("Matcha Latte"));
    assert_eq!(completion.call_count().await, 1);
}

#[tokio::test]
async fn missing_key_uses_the_template_without_calling() {
    let completion = Arc::new(MockCompletion::unconfigured());
    let client = RecipeDetailClient::new(
        completion.clone(),
        Arc::new(StaticPreferences(UserFoodPreferences::default())),
        Duration::from_secs(45),
    );

    let (_, origin) = client.get_recipe_details_traced("Green Tea", None).await;
    assert_eq!(origin, DetailOrigin::Template);
    assert_eq!(completion.call_count().await, 0);
}
