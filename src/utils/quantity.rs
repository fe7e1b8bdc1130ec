use regex::Regex;

/// 拆出行末的 " x{n}" 数量后缀，没有后缀时数量为 1。
/// 分组键是去掉后缀后的原样文字（不做其他修剪）。
pub fn split_quantity_suffix(text: &str) -> (String, u32) {
    let suffix_regex = Regex::new(r"^(.*) x(\d+)$").unwrap();
    match suffix_regex.captures(text) {
        Some(caps) => {
            let quantity = caps[2].parse::<u32>().unwrap_or(1);
            (caps[1].to_string(), quantity)
        }
        None => (text.to_string(), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_suffix() {
        let (base, qty) = split_quantity_suffix("珍珠奶茶 (半糖/少冰) x2");
        assert_eq!(base, "珍珠奶茶 (半糖/少冰)");
        assert_eq!(qty, 2);
    }

    #[test]
    fn test_split_without_suffix() {
        let (base, qty) = split_quantity_suffix("招牌雞腿飯");
        assert_eq!(base, "招牌雞腿飯");
        assert_eq!(qty, 1);
    }

    #[test]
    fn test_split_keeps_only_last_suffix() {
        // 备注里自带 "x2" 字样时，只认最后一个后缀
        let (base, qty) = split_quantity_suffix("紅茶拿鐵 辣度x2 x3");
        assert_eq!(base, "紅茶拿鐵 辣度x2");
        assert_eq!(qty, 3);
    }

    #[test]
    fn test_split_multi_digit() {
        let (base, qty) = split_quantity_suffix("菜飯 x12");
        assert_eq!(base, "菜飯");
        assert_eq!(qty, 12);
    }
}
