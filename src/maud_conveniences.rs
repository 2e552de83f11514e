use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
    when_empty: &'static str,
) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-white border border-gray-300 shadow-md rounded-lg" {
                thead class="bg-gray-200" {
                    tr {
                        @for title in titles {
                            th class="py-3 px-4 text-left text-sm font-medium text-gray-700" {(title)}
                        }
                    }
                }
                tbody {
                    @if items.is_empty() {
                        tr {
                            td colspan=(N) class="py-3 px-4 text-sm text-center text-gray-600" {(when_empty)}
                        }
                    }
                    @for row in items {
                        tr {
                            @for col in row {
                                td class="py-3 px-4 text-sm text-gray-600" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h2 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn error_banner(s: impl Render) -> Markup {
    html! {
        p class="text-lg text-red-500" role="alert" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-medium text-gray-700" {(label)}
            (input)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    ty: Option<&'static str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input type=(ty.unwrap_or("text")) id=(id) name=(id) value=[value] required class="w-full p-2 border border-gray-300 rounded-md" {}
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_shows_placeholder_across_all_columns() {
        let table = render_table(["A", "B"], vec![], "Nothing here").into_string();
        assert!(table.contains(r#"colspan="2""#));
        assert!(table.contains("Nothing here"));
    }

    #[test]
    fn cells_are_escaped() {
        let table = render_table(
            ["Name"],
            vec![[html! { ("<script>alert(1)</script>") }]],
            "",
        )
        .into_string();
        assert!(table.contains("&lt;script&gt;"));
        assert!(!table.contains("<script>alert"));
    }

    #[test]
    fn form_element_prefills_value() {
        let markup = simple_form_element("kelas", "Kelas", None, Some("TI-1A")).into_string();
        assert!(markup.contains(r#"name="kelas""#));
        assert!(markup.contains(r#"value="TI-1A""#));
        assert!(markup.contains(r#"type="text""#));
    }
}
