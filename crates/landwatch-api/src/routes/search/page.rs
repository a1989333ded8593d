//! Search page rendering - Full page and fragments

use crate::{AppState, Identity};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use landwatch_core::format::{
    date_to_input, format_area, format_prev_price, format_price, format_rate, format_signed_price, map_link,
    ChangeTone,
};
use landwatch_core::{
    Bound, BuildingType, DealType, LegalDongCode, Pagination, PriceRange, SearchFilter, SearchOutcome,
    SearchResult, SearchState, SortOrder, PAGE_SIZE_OPTIONS,
};
use landwatch_core::price::PRICE_STEPS;
use landwatch_utils::{escape_html, format_number};
use std::collections::HashMap;

use super::api::state_from_params;

const INPUT_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-blue-500 focus:border-transparent";

const INTRO_TEXT: &str = "검색 조건을 입력하고 검색 버튼을 클릭하거나, &quot;예시 데이터 로드&quot; 버튼을 클릭하여 테스트해보세요.";

pub async fn page_search(
    state: State<AppState>,
    identity: Identity,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let search = state_from_params(&params);
    let region_query = state
        .regions
        .find_by_code(&search.filter().region_code)
        .map(|dong| dong.full_name.clone())
        .unwrap_or_default();

    let inner_content = format!(
        r#"<div class='max-w-7xl mx-auto'>
        <h1 class='text-3xl font-bold text-center mb-8 text-gray-800'>KB부동산 실거래 검색</h1>
        {}
        <div id='search-results'>{}</div>
    </div>"#,
        render_filter_form(search.filter(), &region_query),
        render_results(&search)
    );

    Html(crate::page_response(&headers, "실거래 검색", "/", identity.email(), &inner_content))
}

fn render_select(name: &str, options: &[(String, String)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(value, label)| {
            format!(
                "<option value='{}'{}>{}</option>",
                escape_html(value),
                if value == selected { " selected" } else { "" },
                escape_html(label)
            )
        })
        .collect();
    format!("<select name='{}' class='{}'>{}</select>", name, INPUT_CLASS, options)
}

fn labelled(label: &str, control: &str) -> String {
    format!(
        "<div><label class='block text-sm font-medium text-gray-700 mb-1'>{}</label>{}</div>",
        label, control
    )
}

/// The filter form; swapped whole by "예시 데이터 로드"
pub fn render_filter_form(filter: &SearchFilter, region_query: &str) -> String {
    let building_types: Vec<_> = BuildingType::ALL
        .iter()
        .map(|t| (t.code().to_string(), t.label().to_string()))
        .collect();
    let deal_types: Vec<_> = DealType::ALL
        .iter()
        .map(|t| (t.code().to_string(), t.label().to_string()))
        .collect();
    let sort_orders: Vec<_> = SortOrder::ALL
        .iter()
        .map(|t| (t.code().to_string(), t.label().to_string()))
        .collect();
    let page_sizes: Vec<_> = PAGE_SIZE_OPTIONS
        .iter()
        .map(|n| (n.to_string(), format!("{}개", n)))
        .collect();

    let date_input = |name: &str, value: &str| {
        format!(
            "<input type='date' name='{}' value='{}' class='{}'>",
            name,
            date_to_input(value),
            INPUT_CLASS
        )
    };
    let area_input = |name: &str, value: &str, placeholder: &str| {
        format!(
            "<input type='number' name='{}' value='{}' placeholder='{}' class='{}'>",
            name,
            escape_html(value),
            placeholder,
            INPUT_CLASS
        )
    };

    format!(
        r#"<form id='search-form' hx-get='/search/results' hx-target='#search-results' hx-sync='this:drop' hx-disabled-elt='#search-submit' hx-indicator='#search-indicator' class='bg-white rounded-lg shadow-md p-6 mb-8'>
        <div class='flex justify-between items-center mb-4'>
            <h2 class='text-xl font-semibold text-gray-700'>검색 조건</h2>
            <button type='button' hx-get='/search/example' hx-target='#search-form' hx-swap='outerHTML' class='px-3 py-2 text-sm border border-gray-300 rounded-lg hover:bg-gray-50'>예시 데이터 로드</button>
        </div>
        <input type='hidden' name='신고가구분' value='{}'>
        <input type='hidden' name='법정동레벨' value='{}'>
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4'>
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
        </div>
        <div class='mt-6'>
            <button id='search-submit' type='submit' class='w-full bg-blue-600 text-white py-3 px-4 rounded-lg hover:bg-blue-700 disabled:bg-gray-400 transition-colors font-medium'>
                실거래 검색 <span id='search-indicator' class='htmx-indicator'>(검색 중...)</span>
            </button>
        </div>
    </form>"#,
        escape_html(&filter.report_price_kind),
        escape_html(&filter.region_level),
        labelled("검색 시작일", &date_input("검색시작년월일", &filter.start_date)),
        labelled("검색 종료일", &date_input("검색종료년월일", &filter.end_date)),
        render_region_picker(&filter.region_code, region_query, &[]),
        render_price_control(PriceRange::from_filter(filter)),
        labelled("최소전용면적 (㎡)", &area_input("최소전용면적", &filter.min_area, "예: 56")),
        labelled("최대전용면적 (㎡)", &area_input("최대전용면적", &filter.max_area, "예: 90")),
        labelled("건물유형구분", &render_select("건물유형구분", &building_types, &filter.building_type)),
        labelled("거래구분", &render_select("거래구분", &deal_types, &filter.deal_type)),
        labelled("정렬구분", &render_select("정렬구분", &sort_orders, &filter.sort_order)),
        labelled("페이지목록수", &render_select("페이지목록수", &page_sizes, &filter.page_size)),
    )
}

/// Region typeahead: text box, hidden code field and suggestion list
pub fn render_region_picker(code: &str, query: &str, suggestions: &[LegalDongCode]) -> String {
    let selected = if code.is_empty() {
        String::new()
    } else {
        format!(
            "<div class='mt-1 text-xs text-gray-500'>선택된 코드: {}</div>",
            escape_html(code)
        )
    };
    format!(
        r#"<div id='region-picker' class='relative'>
            <label class='block text-sm font-medium text-gray-700 mb-1'>법정동코드</label>
            <input type='text' name='region_query' value='{}' placeholder='잠실동' autocomplete='off'
                hx-get='/regions/suggest' hx-trigger='keyup changed delay:300ms' hx-target='#region-suggest' class='{}'>
            <input type='hidden' name='법정동코드' value='{}'>
            <div id='region-suggest'>{}</div>
            {}
        </div>"#,
        escape_html(query),
        INPUT_CLASS,
        escape_html(code),
        render_suggestions(suggestions),
        selected
    )
}

/// Suggestion list; empty markup when there is nothing to show
pub fn render_suggestions(suggestions: &[LegalDongCode]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let items: String = suggestions
        .iter()
        .map(|dong| {
            format!(
                r#"<div class='px-3 py-2 hover:bg-gray-100 cursor-pointer border-b border-gray-100 last:border-b-0'
                    hx-get='/regions/select?code={}' hx-target='#region-picker' hx-swap='outerHTML'>
                    <div class='font-medium text-gray-900'>{}</div>
                    <div class='text-sm text-gray-500'>코드: {}</div>
                </div>"#,
                urlencoding::encode(&dong.code),
                escape_html(&dong.full_name),
                escape_html(&dong.code)
            )
        })
        .collect();
    format!(
        "<div class='absolute z-10 w-full mt-1 bg-white border border-gray-300 rounded-lg shadow-lg max-h-60 overflow-y-auto'>{}</div>",
        items
    )
}

/// Two-handle price slider plus the hidden 만원 fields it drives
pub fn render_price_control(range: PriceRange) -> String {
    let mut filter = SearchFilter::default();
    range.apply_to(&mut filter);

    let slider = |bound: Bound, name: &str, label: &str, value: u32| {
        format!(
            r#"<div>
                <label class='block text-sm text-gray-600 mb-2'>{}</label>
                <input type='range' name='{}' min='0' max='{}' step='1' value='{}'
                    hx-get='/search/price' hx-trigger='change' hx-vals='{{"bound":"{}"}}'
                    hx-include='#price-control' hx-target='#price-control' hx-swap='outerHTML'
                    class='w-full h-2 bg-gray-200 rounded-lg appearance-none cursor-pointer'>
                <div class='text-center mt-1'><span class='text-sm font-medium text-gray-900'>{}</span></div>
            </div>"#,
            label,
            name,
            PRICE_STEPS,
            value,
            if bound == Bound::Min { "min" } else { "max" },
            PriceRange::label(value, bound)
        )
    };

    format!(
        r#"<div id='price-control' class='lg:col-span-2'>
            <label class='block text-sm font-medium text-gray-700 mb-3'>금액 범위 (억원)</label>
            <input type='hidden' name='최소금액' value='{}'>
            <input type='hidden' name='최대금액' value='{}'>
            <div class='space-y-4'>{}{}</div>
        </div>"#,
        filter.min_price,
        filter.max_price,
        slider(Bound::Min, "min_step", "최소 금액", range.min()),
        slider(Bound::Max, "max_step", "최대 금액", range.max()),
    )
}

fn render_row(result: &SearchResult) -> String {
    let tone = ChangeTone::from_rate(result.change_rate);
    let previous = if result.has_previous_deal() {
        let floor = if result.prev_floor.is_empty() {
            String::new()
        } else {
            format!("<div class='text-xs'>{}층</div>", escape_html(&result.prev_floor))
        };
        format!(
            "<div>{}</div><div class='text-xs'>{}</div>{}",
            format_prev_price(result.prev_price),
            escape_html(&result.prev_deal_date),
            floor
        )
    } else {
        format_prev_price(result.prev_price)
    };

    format!(
        r#"<tr class='border-b hover:bg-gray-50'>
            <td class='px-3 py-3 text-center'><span class='inline-flex items-center justify-center w-6 h-6 bg-blue-100 text-blue-800 text-xs font-medium rounded-full'>{}</span></td>
            <td class='px-3 py-3 font-medium text-gray-900'><div class='flex items-center gap-2'>{} <a href='{}' target='_blank' rel='noopener noreferrer' class='text-blue-600 hover:text-blue-800' title='지도에서 보기'>📍</a></div></td>
            <td class='px-3 py-3 text-sm text-gray-600'>{}</td>
            <td class='px-3 py-3 text-sm'>{}</td>
            <td class='px-3 py-3 font-semibold text-green-600'>{}</td>
            <td class='px-3 py-3 text-sm'>{}</td>
            <td class='px-3 py-3 text-sm'>{}층</td>
            <td class='px-3 py-3 text-sm text-gray-500'>{}</td>
            <td class='px-3 py-3 text-sm'>
                <div class='font-medium {}'><span class='mr-1'>{}</span>{}</div>
                <div class='text-xs {}'>{}</div>
            </td>
            <td class='px-3 py-3 text-sm text-gray-500'>{}</td>
        </tr>"#,
        result.rank,
        escape_html(&result.complex_name),
        escape_html(&map_link(&result.complex_name, &result.region_name)),
        escape_html(&result.region_name),
        escape_html(&format_area(&result.area, result.pyeong)),
        format_price(result.price),
        escape_html(&result.deal_date),
        escape_html(&result.floor),
        previous,
        tone.css_class(),
        tone.arrow(),
        format_signed_price(result.change_amount),
        tone.css_class(),
        format_rate(result.change_rate),
        escape_html(&result.lot_number),
    )
}

fn page_url(page: u32, pagination: &Pagination) -> String {
    format!(
        "/search/results?page={}&current_page={}&total_pages={}&total_size={}",
        page, pagination.current, pagination.total_pages, pagination.total_size
    )
}

/// Previous / numbered / next buttons plus the page summary line
///
/// Renders nothing for a single page.
pub fn render_pagination(pagination: &Pagination) -> String {
    if !pagination.is_visible() {
        return String::new();
    }
    const NAV_CLASS: &str = "px-3 py-2 text-sm border border-gray-300 rounded-lg hover:bg-gray-50 disabled:bg-gray-100 disabled:text-gray-400 disabled:cursor-not-allowed";

    let nav_button = |label: &str, page: u32, enabled: bool| {
        format!(
            "<button type='button' hx-get='{}' hx-include='#search-form' hx-target='#search-results'{} class='{}'>{}</button>",
            page_url(page, pagination),
            if enabled { "" } else { " disabled" },
            NAV_CLASS,
            label
        )
    };

    let numbers: String = pagination
        .window()
        .into_iter()
        .map(|page| {
            let class = if page == pagination.current {
                "bg-blue-600 text-white border-blue-600"
            } else {
                "border-gray-300 hover:bg-gray-50"
            };
            format!(
                "<button type='button' hx-get='{}' hx-include='#search-form' hx-target='#search-results' class='px-3 py-2 text-sm border rounded-lg {}'>{}</button>",
                page_url(page, pagination),
                class,
                page
            )
        })
        .collect();

    format!(
        r#"<div class='mt-6 flex justify-center'><div class='flex items-center space-x-2'>{}{}{}</div></div>
        <div class='mt-4 text-center text-sm text-gray-500'>{} / {} 페이지 (총 {}건)</div>"#,
        nav_button("이전", pagination.prev_page(), pagination.has_prev()),
        numbers,
        nav_button("다음", pagination.next_page(), pagination.has_next()),
        pagination.current,
        pagination.total_pages,
        format_number(pagination.total_size)
    )
}

/// Result table, or the banner that replaces it
pub fn render_results(search: &SearchState) -> String {
    let banner = match search.outcome() {
        Some(SearchOutcome::Failed { message, .. }) => format!(
            "<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-4 mb-4'>{}</div>",
            escape_html(message)
        ),
        _ => String::new(),
    };

    let page = search.page();
    if page.is_empty() {
        let text = match search.outcome() {
            None | Some(SearchOutcome::Failed { .. }) => INTRO_TEXT,
            Some(_) => "조회된 거래가 없습니다.",
        };
        return format!(
            "{}<div class='bg-white rounded-lg shadow-md p-6 text-center text-gray-500'>{}</div>",
            banner, text
        );
    }

    let update_date = if page.update_date.is_empty() {
        String::new()
    } else {
        format!(
            "<span class='text-sm text-gray-500'>업데이트: {}</span>",
            escape_html(&page.update_date)
        )
    };
    let rows: String = page.results.iter().map(render_row).collect();

    format!(
        r#"{}<div class='bg-white rounded-lg shadow-md p-6'>
        <div class='flex justify-between items-center mb-4'>
            <h2 class='text-xl font-semibold text-gray-700'>검색 결과 ({}건)</h2>
            {}
        </div>
        <div class='overflow-x-auto'>
            <table class='w-full table-auto'>
                <thead><tr class='bg-gray-100'>
                    <th class='px-3 py-2 text-left text-sm font-medium'>순위</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>단지명</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>지역명</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>전용면적</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>거래금액</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>거래일자</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>거래층</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>직전거래</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>변동</th>
                    <th class='px-3 py-2 text-left text-sm font-medium'>번지</th>
                </tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
        {}
    </div>"#,
        banner,
        format_number(page.total_size),
        update_date,
        rows,
        render_pagination(&search.pagination())
    )
}
