use crate::config::OrderFormConfig;

/// 外部表单的预填网址。订单送出其实就是把使用者转址到这个网址，
/// 表单那端写入纪录表；没有任何回执通道，不重试也不确认。
pub struct OrderFormClient {
    config: OrderFormConfig,
}

impl OrderFormClient {
    pub fn new(config: OrderFormConfig) -> Self {
        Self { config }
    }

    pub fn submission_url(
        &self,
        user_name: &str,
        region: &str,
        shop: &str,
        items: &str,
        total: i64,
    ) -> String {
        let total = total.to_string();
        let fields = [
            (&self.config.name_field, user_name),
            (&self.config.region_field, region),
            (&self.config.shop_field, shop),
            (&self.config.items_field, items),
            (&self.config.total_field, total.as_str()),
        ];

        let query = fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.config.endpoint.contains('?') {
            '&'
        } else {
            '?'
        };
        format!("{}{}{}", self.config.endpoint, separator, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OrderFormConfig {
        OrderFormConfig {
            endpoint: "https://forms.example.com/d/abc/viewform".to_string(),
            name_field: "entry.100".to_string(),
            region_field: "entry.200".to_string(),
            shop_field: "entry.300".to_string(),
            items_field: "entry.400".to_string(),
            total_field: "entry.500".to_string(),
        }
    }

    #[test]
    fn test_submission_url_encodes_all_fields() {
        let client = OrderFormClient::new(test_config());
        let url = client.submission_url("小明", "台北", "50嵐", "珍珠奶茶 (半糖/少冰) x2", 120);

        assert!(url.starts_with("https://forms.example.com/d/abc/viewform?"));
        assert!(url.contains("entry.100=%E5%B0%8F%E6%98%8E"));
        assert!(url.contains("entry.500=120"));
        // 空格与括号也要编码
        assert!(!url.contains(' '));
        assert!(url.contains("%20"));
        assert!(url.contains("%28"));
    }

    #[test]
    fn test_submission_url_appends_to_existing_query() {
        let mut config = test_config();
        config.endpoint = "https://forms.example.com/d/abc/viewform?usp=pp_url".to_string();
        let client = OrderFormClient::new(config);
        let url = client.submission_url("小明", "台北", "50嵐", "菜飯", 80);
        assert!(url.contains("viewform?usp=pp_url&entry.100="));
    }
}
