use crate::models::Task;
use reqwest::Client;
use serde_json::json;
use std::error::Error;

pub async fn fetch_tasks(server_url: &str) -> Result<Vec<Task>, reqwest::Error> {
    let client = Client::new();
    let url = format!("{}/api/todos", server_url);

    let res = client
        .get(&url)
        .send()
        .await?
        .json::<Vec<Task>>()
        .await?;

    Ok(res)
}

pub async fn create_task(server_url: &str, content: &str) -> Result<Task, Box<dyn Error>> {
    let client = Client::new();
    let url = format!("{}/api/todos", server_url);

    let res = client
        .post(&url)
        .json(&json!({ "content": content }))
        .send()
        .await?;

    if res.status().is_success() {
        let task = res.json::<Task>().await?;
        Ok(task)
    } else {
        let error_text = res.text().await?;
        Err(format!("Error creating task: {}", error_text).into())
    }
}

pub async fn set_completed(
    server_url: &str,
    id: i64,
    completed: bool,
) -> Result<Task, Box<dyn Error>> {
    let client = Client::new();
    let url = format!("{}/api/todos", server_url);

    let res = client
        .patch(&url)
        .json(&json!({ "id": id, "completed": completed }))
        .send()
        .await?;

    if res.status().is_success() {
        let task = res.json::<Task>().await?;
        Ok(task)
    } else {
        let error_text = res.text().await?;
        Err(format!("Error updating task: {}", error_text).into())
    }
}

pub async fn delete_task(server_url: &str, id: i64) -> Result<Task, Box<dyn Error>> {
    let client = Client::new();
    let url = format!("{}/api/todos", server_url);

    let res = client
        .delete(&url)
        .json(&json!({ "id": id }))
        .send()
        .await?;

    if res.status().is_success() {
        let task = res.json::<Task>().await?;
        Ok(task)
    } else {
        let error_text = res.text().await?;
        Err(format!("Error deleting task: {}", error_text).into())
    }
}
